//! Phone numbers available on a telephony account. Fetched on demand when
//! linking a number to an agent; nothing mutates them, so there is no view.

use tone_core::normalize::decode_list;
use tone_core::{FetchError, ResourceKind, TwilioPhoneNumber};

use crate::endpoints;
use crate::transport::Transport;

pub const DEFAULT_PHONE_PROVIDER: &str = "twilio";

pub async fn fetch_phone_numbers(
    transport: &dyn Transport,
    provider: &str,
) -> Result<Vec<TwilioPhoneNumber>, FetchError> {
    // Numbers come from the channel integrations, so failures are reported
    // against channels.
    let resource = ResourceKind::Channels;
    let query = [("type", provider.to_string())];
    let body = transport
        .get(endpoints::TWILIO_PHONE_NUMBERS, &query)
        .await
        .map_err(|source| FetchError::Api { resource, source })?;
    if body.is_null() {
        return Ok(Vec::new());
    }
    decode_list(resource, body)
}
