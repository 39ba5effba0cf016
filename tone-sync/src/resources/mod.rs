//! Per-resource handles: a refresh counter, the view derived from it, and the
//! mutations that invalidate it.
//!
//! [`Resource<T>`] is generic; the write operations each resource supports
//! live in `impl Resource<Record>` blocks in the submodules.

mod agents;
mod channels;
mod invitations;
mod members;
mod phone_numbers;
mod providers;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use tone_core::{ApiError, RemoteWriteError, ResourceKind, WriteAction};

use crate::counter::RefreshCounter;
use crate::fetcher::Fetcher;
use crate::mutation;
use crate::transport::Transport;
use crate::view::{AsyncView, ViewSubscription};

pub use phone_numbers::{fetch_phone_numbers, DEFAULT_PHONE_PROVIDER};

pub(crate) use agents::agents;
pub(crate) use channels::channels;
pub(crate) use invitations::invitations;
pub(crate) use members::members;
pub(crate) use providers::providers;

pub struct Resource<T> {
    counter: Arc<RefreshCounter>,
    view: AsyncView<T>,
    transport: Arc<dyn Transport>,
}

impl<T> Resource<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(
        kind: ResourceKind,
        transport: Arc<dyn Transport>,
        fetcher: Arc<dyn Fetcher<T>>,
    ) -> Self {
        let counter = Arc::new(RefreshCounter::new(kind));
        let view = AsyncView::new(Arc::clone(&counter), fetcher);
        Self {
            counter,
            view,
            transport,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.counter.resource()
    }

    pub fn view(&self) -> &AsyncView<T> {
        &self.view
    }

    pub fn subscribe(&self) -> ViewSubscription<T> {
        self.view.subscribe()
    }

    pub fn refresh_token(&self) -> u64 {
        self.counter.value()
    }

    /// Force a re-fetch without writing anything.
    pub fn refetch(&self) -> u64 {
        let token = self.counter.increment();
        tracing::debug!(resource = %self.kind(), token, "manual refetch");
        token
    }

    /// Run `write` and invalidate this resource if it succeeds.
    pub(crate) async fn write<F>(
        &self,
        action: WriteAction,
        write: F,
    ) -> Result<Value, RemoteWriteError>
    where
        F: Future<Output = Result<Value, ApiError>>,
    {
        mutation::perform(&self.counter, action, write).await
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

/// Serialize a mutation payload into a request body.
pub(crate) fn encode<P: Serialize>(payload: &P) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Encode(e.to_string()))
}
