//! Error types for tone-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ResourceKind, WriteAction};

/// Failure reported by the REST transport for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, TLS error.
    #[error("network error: {0}")]
    Network(String),

    /// 401/403: the stored session is missing, expired or lacks permission.
    #[error("unauthorized (HTTP {status}): {detail}")]
    Unauthorized { status: u16, detail: String },

    /// Any other non-2xx response. `detail` is the backend's message when it sent one.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// 2xx response whose body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request payload could not be serialized.
    #[error("invalid request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// `true` when the caller should send the user back to the login flow.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::Encode(_) => None,
        }
    }
}

/// Read failure for a resource list. Captured into the view's `Error` state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to fetch {resource}: {source}")]
    Api {
        resource: ResourceKind,
        #[source]
        source: ApiError,
    },

    /// A list element did not match the record schema.
    #[error("failed to decode {resource} record: {message}")]
    Decode {
        resource: ResourceKind,
        message: String,
    },
}

impl FetchError {
    pub fn resource(&self) -> ResourceKind {
        match self {
            FetchError::Api { resource, .. } | FetchError::Decode { resource, .. } => *resource,
        }
    }
}

/// Write failure for a create/update/delete. Always propagated to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {action} {resource}: {source}")]
pub struct RemoteWriteError {
    pub resource: ResourceKind,
    pub action: WriteAction,
    #[source]
    pub source: ApiError,
}

/// A list endpoint answered with something that is not a list.
///
/// Never surfaced to consumers: [`crate::normalize::decode_list`] logs it and
/// substitutes an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a list but got {found}")]
pub struct MalformedResponse {
    pub found: &'static str,
}

/// All errors that can arise from session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Session file exists but could not be parsed.
    #[error("failed to parse session at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
