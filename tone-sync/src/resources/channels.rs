use std::sync::Arc;

use serde_json::Value;

use tone_core::normalize::decode_list;
use tone_core::{
    Channel, ChannelPayload, ChannelRow, FetchError, RemoteWriteError, ResourceKind, WriteAction,
};

use super::{encode, Resource};
use crate::endpoints;
use crate::fetcher::ListEndpoint;
use crate::transport::Transport;

pub(crate) fn channels(transport: Arc<dyn Transport>) -> Resource<ChannelRow> {
    let fetcher = ListEndpoint::<ChannelRow>::with_decoder(
        Arc::clone(&transport),
        ResourceKind::Channels,
        endpoints::CHANNELS_LIST,
        decode_rows,
    );
    Resource::new(ResourceKind::Channels, transport, Arc::new(fetcher))
}

/// Channels are shown as masked, formatted rows.
fn decode_rows(resource: ResourceKind, body: Value) -> Result<Vec<ChannelRow>, FetchError> {
    let channels: Vec<Channel> = decode_list(resource, body)?;
    Ok(channels.into_iter().map(ChannelRow::from).collect())
}

impl Resource<ChannelRow> {
    /// Create the integration, or update it when `payload.id` is set.
    pub async fn upsert(&self, payload: &ChannelPayload) -> Result<(), RemoteWriteError> {
        self.write(WriteAction::Upsert, async {
            let body = encode(payload)?;
            self.transport().post(endpoints::CHANNEL_UPSERT, body).await
        })
        .await?;
        Ok(())
    }

    pub async fn delete(&self, channel_id: i64) -> Result<(), RemoteWriteError> {
        self.write(WriteAction::Delete, async {
            let query = [("channel_id", channel_id.to_string())];
            self.transport().delete(endpoints::CHANNEL_DELETE, &query).await
        })
        .await?;
        Ok(())
    }
}
