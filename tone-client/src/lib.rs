//! HTTP side of tone: configuration, the ureq-backed [`HttpTransport`], and
//! the login flow that produces a stored session.

pub mod auth;
pub mod config;
mod error;
pub mod http;

pub use auth::{login, login_at, login_with, logout, logout_at, Credentials};
pub use config::{Config, DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT_SECS};
pub use error::ClientError;
pub use http::HttpTransport;
