use std::sync::Arc;

use serde_json::json;

use tone_core::{OrganizationMember, RemoteWriteError, ResourceKind, RoleUpdate, WriteAction};

use super::Resource;
use crate::endpoints;
use crate::fetcher::ListEndpoint;
use crate::transport::Transport;

pub(crate) fn members(transport: Arc<dyn Transport>) -> Resource<OrganizationMember> {
    let fetcher = ListEndpoint::<OrganizationMember>::new(
        Arc::clone(&transport),
        ResourceKind::Members,
        endpoints::MEMBERS_LIST,
    );
    Resource::new(ResourceKind::Members, transport, Arc::new(fetcher))
}

impl Resource<OrganizationMember> {
    pub async fn update_role(&self, update: RoleUpdate) -> Result<(), RemoteWriteError> {
        self.write(WriteAction::UpdateRole, async {
            let path = endpoints::member(update.member_id);
            let body = json!({ "role": update.role.to_string() });
            self.transport().patch(&path, body).await
        })
        .await?;
        Ok(())
    }
}
