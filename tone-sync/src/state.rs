//! Tagged async state exposed to consumers.

use std::sync::Arc;

use tone_core::FetchError;

/// Exactly one of Loading / Ready / Error at any observed instant.
///
/// `Ready` holds an immutable snapshot; a refetch replaces it wholesale.
#[derive(Debug, PartialEq)]
pub enum AsyncState<T> {
    Loading,
    Ready(Arc<[T]>),
    Error(FetchError),
}

// Cloning shares the snapshot, so `T` itself need not be `Clone`.
impl<T> Clone for AsyncState<T> {
    fn clone(&self) -> Self {
        match self {
            AsyncState::Loading => AsyncState::Loading,
            AsyncState::Ready(items) => AsyncState::Ready(Arc::clone(items)),
            AsyncState::Error(err) => AsyncState::Error(err.clone()),
        }
    }
}

impl<T> AsyncState<T> {
    pub fn ready(items: Vec<T>) -> Self {
        AsyncState::Ready(items.into())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AsyncState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AsyncState::Ready(_))
    }

    /// The loaded rows, if any.
    pub fn data(&self) -> Option<&[T]> {
        match self {
            AsyncState::Ready(items) => Some(items),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            AsyncState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Stable lowercase tag for logs and JSON output.
    pub fn label(&self) -> &'static str {
        match self {
            AsyncState::Loading => "loading",
            AsyncState::Ready(_) => "ready",
            AsyncState::Error(_) => "error",
        }
    }
}

impl<T> From<Result<Vec<T>, FetchError>> for AsyncState<T> {
    fn from(outcome: Result<Vec<T>, FetchError>) -> Self {
        match outcome {
            Ok(items) => AsyncState::ready(items),
            Err(err) => AsyncState::Error(err),
        }
    }
}
