//! Remote resource fetchers: async `() -> list` functions a view re-runs.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use tone_core::normalize::decode_list;
use tone_core::{FetchError, ResourceKind};

use crate::transport::Transport;

#[async_trait]
pub trait Fetcher<T>: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Vec<T>, FetchError>;
}

/// Adapts an async closure into a [`Fetcher`].
pub struct FnFetcher<F>(F);

pub fn fetcher_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher(f)
}

#[async_trait]
impl<T, F, Fut> Fetcher<T> for FnFetcher<F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, FetchError>> + Send + 'static,
{
    async fn fetch(&self) -> Result<Vec<T>, FetchError> {
        (self.0)().await
    }
}

/// Turns a raw response body into records.
pub type Decoder<T> = fn(ResourceKind, Value) -> Result<Vec<T>, FetchError>;

/// `GET <path>` on the transport, then normalize and decode the list.
pub struct ListEndpoint<T> {
    transport: Arc<dyn Transport>,
    resource: ResourceKind,
    path: &'static str,
    decode: Decoder<T>,
}

impl<T: DeserializeOwned> ListEndpoint<T> {
    pub fn new(transport: Arc<dyn Transport>, resource: ResourceKind, path: &'static str) -> Self {
        Self::with_decoder(transport, resource, path, decode_list::<T>)
    }
}

impl<T> ListEndpoint<T> {
    pub fn with_decoder(
        transport: Arc<dyn Transport>,
        resource: ResourceKind,
        path: &'static str,
        decode: Decoder<T>,
    ) -> Self {
        Self {
            transport,
            resource,
            path,
            decode,
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Fetcher<T> for ListEndpoint<T> {
    async fn fetch(&self) -> Result<Vec<T>, FetchError> {
        let body = self
            .transport
            .get(self.path, &[])
            .await
            .map_err(|source| FetchError::Api {
                resource: self.resource,
                source,
            })?;
        (self.decode)(self.resource, body)
    }
}
