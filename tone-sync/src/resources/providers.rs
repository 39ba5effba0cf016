use std::sync::Arc;

use tone_core::{ResourceKind, ServiceProvider};

use super::Resource;
use crate::endpoints;
use crate::fetcher::ListEndpoint;
use crate::transport::Transport;

/// Read-only: providers are configured server side.
pub(crate) fn providers(transport: Arc<dyn Transport>) -> Resource<ServiceProvider> {
    let fetcher = ListEndpoint::<ServiceProvider>::new(
        Arc::clone(&transport),
        ResourceKind::Providers,
        endpoints::PROVIDERS_LIST,
    );
    Resource::new(ResourceKind::Providers, transport, Arc::new(fetcher))
}
