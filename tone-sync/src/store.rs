//! The application-root store.
//!
//! One [`Store`] owns every resource handle and is passed to whatever needs
//! them. There is no global state: two stores never share counters or views.

use std::sync::Arc;

use tone_core::{
    Agent, ChannelRow, FetchError, OrganizationInvite, OrganizationMember, ResourceKind,
    ServiceProvider, TwilioPhoneNumber,
};

use crate::resources::{self, Resource};
use crate::transport::Transport;

pub struct Store {
    transport: Arc<dyn Transport>,
    agents: Resource<Agent>,
    channels: Resource<ChannelRow>,
    providers: Resource<ServiceProvider>,
    members: Resource<OrganizationMember>,
    invitations: Resource<OrganizationInvite>,
}

impl Store {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            agents: resources::agents(Arc::clone(&transport)),
            channels: resources::channels(Arc::clone(&transport)),
            providers: resources::providers(Arc::clone(&transport)),
            members: resources::members(Arc::clone(&transport)),
            invitations: resources::invitations(Arc::clone(&transport)),
            transport,
        }
    }

    pub fn agents(&self) -> &Resource<Agent> {
        &self.agents
    }

    pub fn channels(&self) -> &Resource<ChannelRow> {
        &self.channels
    }

    pub fn providers(&self) -> &Resource<ServiceProvider> {
        &self.providers
    }

    pub fn members(&self) -> &Resource<OrganizationMember> {
        &self.members
    }

    pub fn invitations(&self) -> &Resource<OrganizationInvite> {
        &self.invitations
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn refresh_token(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Agents => self.agents.refresh_token(),
            ResourceKind::Channels => self.channels.refresh_token(),
            ResourceKind::Providers => self.providers.refresh_token(),
            ResourceKind::Members => self.members.refresh_token(),
            ResourceKind::Invitations => self.invitations.refresh_token(),
        }
    }

    pub fn refetch(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Agents => self.agents.refetch(),
            ResourceKind::Channels => self.channels.refetch(),
            ResourceKind::Providers => self.providers.refetch(),
            ResourceKind::Members => self.members.refetch(),
            ResourceKind::Invitations => self.invitations.refetch(),
        }
    }

    /// Numbers on the telephony account for `provider` (usually "twilio").
    pub async fn phone_numbers(&self, provider: &str) -> Result<Vec<TwilioPhoneNumber>, FetchError> {
        resources::fetch_phone_numbers(self.transport.as_ref(), provider).await
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Store");
        for kind in ResourceKind::all() {
            out.field(&kind.to_string(), &self.refresh_token(kind));
        }
        out.finish()
    }
}
