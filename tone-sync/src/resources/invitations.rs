use std::sync::Arc;

use tone_core::{InvitePayload, OrganizationInvite, RemoteWriteError, ResourceKind, WriteAction};

use super::{encode, Resource};
use crate::endpoints;
use crate::fetcher::ListEndpoint;
use crate::transport::Transport;

pub(crate) fn invitations(transport: Arc<dyn Transport>) -> Resource<OrganizationInvite> {
    let fetcher = ListEndpoint::<OrganizationInvite>::new(
        Arc::clone(&transport),
        ResourceKind::Invitations,
        endpoints::INVITATIONS_LIST,
    );
    Resource::new(ResourceKind::Invitations, transport, Arc::new(fetcher))
}

impl Resource<OrganizationInvite> {
    /// Invite someone into the current organization. Only the invitations
    /// list is invalidated; the member appears once the invite is accepted.
    pub async fn invite(&self, payload: &InvitePayload) -> Result<(), RemoteWriteError> {
        self.write(WriteAction::Invite, async {
            let body = encode(payload)?;
            self.transport().post(endpoints::INVITE, body).await
        })
        .await?;
        Ok(())
    }
}
