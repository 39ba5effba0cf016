//! The REST client seam.
//!
//! Implementations return the decoded JSON body of a 2xx response (or `null`
//! for an empty body) and map everything else to [`ApiError`]. Schemas are the
//! backend's business; this layer only moves JSON.

use async_trait::async_trait;
use serde_json::Value;

use tone_core::ApiError;

/// Query-string pairs appended to a request path.
pub type Query<'a> = &'a [(&'a str, String)];

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(&self, path: &str, query: Query<'_>) -> Result<Value, ApiError>;

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    async fn delete(&self, path: &str, query: Query<'_>) -> Result<Value, ApiError>;
}
