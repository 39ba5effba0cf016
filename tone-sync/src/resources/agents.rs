use std::sync::Arc;

use serde_json::Value;

use tone_core::{
    Agent, AgentPayload, ApiError, PhoneNumberLink, RemoteWriteError, ResourceKind, WriteAction,
};

use super::{encode, Resource};
use crate::endpoints;
use crate::fetcher::ListEndpoint;
use crate::transport::Transport;

pub(crate) fn agents(transport: Arc<dyn Transport>) -> Resource<Agent> {
    let fetcher = ListEndpoint::<Agent>::new(
        Arc::clone(&transport),
        ResourceKind::Agents,
        endpoints::AGENTS_LIST,
    );
    Resource::new(ResourceKind::Agents, transport, Arc::new(fetcher))
}

impl Resource<Agent> {
    /// Create the agent, or update it when `payload.id` is set.
    pub async fn upsert(&self, payload: &AgentPayload) -> Result<(), RemoteWriteError> {
        self.write(WriteAction::Upsert, async {
            let body = encode(payload)?;
            self.transport().post(endpoints::AGENT_UPSERT, body).await
        })
        .await?;
        Ok(())
    }

    pub async fn delete(&self, agent_id: i64) -> Result<(), RemoteWriteError> {
        self.write(WriteAction::Delete, async {
            let query = [("agent_id", agent_id.to_string())];
            self.transport().delete(endpoints::AGENT_DELETE, &query).await
        })
        .await?;
        Ok(())
    }

    /// Link phone numbers to agents, one request per number.
    ///
    /// The first rejected number ends the write and agents are not refreshed.
    /// An empty `links` writes nothing.
    pub async fn link_phone_numbers(&self, links: &[PhoneNumberLink]) -> Result<(), RemoteWriteError> {
        if links.is_empty() {
            return Ok(());
        }
        self.write(WriteAction::LinkNumbers, async {
            let mut last = Value::Null;
            for link in links {
                let body = encode(link)?;
                last = self.transport().post(endpoints::PHONE_NUMBER_LINK, body).await?;
            }
            Ok::<_, ApiError>(last)
        })
        .await?;
        Ok(())
    }
}
