//! Backend routes used by the resource handles.

pub const AGENTS_LIST: &str = "/agent/get_all_agents";
pub const AGENT_UPSERT: &str = "/agent/upsert_agent";
pub const AGENT_DELETE: &str = "/agent/delete";

pub const CHANNELS_LIST: &str = "/channel/list";
pub const CHANNEL_UPSERT: &str = "/channel/upsert";
pub const CHANNEL_DELETE: &str = "/channel/delete";

pub const PROVIDERS_LIST: &str = "/service-providers/list";

pub const MEMBERS_LIST: &str = "/organizations/members";
pub const INVITATIONS_LIST: &str = "/organizations/invitations";
pub const INVITE: &str = "/organizations/invite";

pub const TWILIO_PHONE_NUMBERS: &str = "/channel_phone_number/get_twilio_phone_numbers";
pub const PHONE_NUMBER_LINK: &str = "/channel_phone_number/upsert_channel_phone_number";

pub const LOGIN: &str = "/auth/login";

/// `PATCH` target for a member's role.
pub fn member(member_id: i64) -> String {
    format!("{MEMBERS_LIST}/{member_id}")
}
