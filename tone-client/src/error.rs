use std::path::PathBuf;

use thiserror::Error;

use tone_core::{ApiError, SessionError};

/// Error surface for configuration, login and session handling.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidSetting {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("login response was not understood: {0}")]
    LoginResponse(String),

    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ClientError {
    ClientError::Io {
        path: path.into(),
        source,
    }
}
