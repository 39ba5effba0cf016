//! Domain records for the Tone backend.
//!
//! Records are decoded leniently: the backend is not under our control, so
//! nullable strings collapse to empty, epoch fields accept numbers or numeric
//! strings, and unknown enum spellings fall back to a catch-all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::format::{format_display_name, format_epoch_datetime};

// ---------------------------------------------------------------------------
// Resource identity
// ---------------------------------------------------------------------------

/// A named remote collection that has its own refresh counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Agents,
    Channels,
    Providers,
    Members,
    Invitations,
}

impl ResourceKind {
    pub fn all() -> [ResourceKind; 5] {
        [
            ResourceKind::Agents,
            ResourceKind::Channels,
            ResourceKind::Providers,
            ResourceKind::Members,
            ResourceKind::Invitations,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Agents => write!(f, "agents"),
            ResourceKind::Channels => write!(f, "channels"),
            ResourceKind::Providers => write!(f, "service providers"),
            ResourceKind::Members => write!(f, "members"),
            ResourceKind::Invitations => write!(f, "invitations"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agents" | "agent" => Ok(ResourceKind::Agents),
            "channels" | "channel" | "integrations" => Ok(ResourceKind::Channels),
            "providers" | "provider" | "service-providers" => Ok(ResourceKind::Providers),
            "members" | "member" => Ok(ResourceKind::Members),
            "invitations" | "invitation" | "invites" => Ok(ResourceKind::Invitations),
            other => Err(format!(
                "unknown resource '{other}'; expected: agents, channels, providers, members, invitations"
            )),
        }
    }
}

/// The kind of remote write a mutation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteAction {
    Upsert,
    Delete,
    Invite,
    UpdateRole,
    LinkNumbers,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteAction::Upsert => write!(f, "upsert"),
            WriteAction::Delete => write!(f, "delete"),
            WriteAction::Invite => write!(f, "invite into"),
            WriteAction::UpdateRole => write!(f, "update a role in"),
            WriteAction::LinkNumbers => write!(f, "link phone numbers to"),
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Direction/surface of a voice agent.
///
/// The backend has sent both spellings (`"inbound"`) and legacy integer codes
/// (`0` for inbound); anything unrecognised is treated as outbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Inbound,
    #[default]
    Outbound,
    Widget,
    Chat,
}

impl AgentType {
    pub fn from_value(raw: &Value) -> Self {
        match raw {
            Value::String(s) => s.parse().unwrap_or_default(),
            Value::Number(n) if n.as_i64() == Some(0) => AgentType::Inbound,
            _ => AgentType::Outbound,
        }
    }
}

impl<'de> Deserialize<'de> for AgentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(AgentType::from_value(&raw))
    }
}

impl FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inbound" => Ok(AgentType::Inbound),
            "outbound" => Ok(AgentType::Outbound),
            "widget" => Ok(AgentType::Widget),
            "chat" => Ok(AgentType::Chat),
            other => Err(format!(
                "unknown agent type '{other}'; expected: inbound, outbound, widget, chat"
            )),
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentType::Inbound => write!(f, "Inbound"),
            AgentType::Outbound => write!(f, "Outbound"),
            AgentType::Widget => write!(f, "Widget"),
            AgentType::Chat => write!(f, "Chat"),
        }
    }
}

/// Category of an external service provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Llm,
    Tts,
    Stt,
    #[serde(other)]
    Other,
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Ok(ProviderType::Llm),
            "tts" => Ok(ProviderType::Tts),
            "stt" => Ok(ProviderType::Stt),
            other => Err(format!(
                "unknown provider type '{other}'; expected: llm, tts, stt"
            )),
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Llm => write!(f, "llm"),
            ProviderType::Tts => write!(f, "tts"),
            ProviderType::Stt => write!(f, "stt"),
            ProviderType::Other => write!(f, "other"),
        }
    }
}

/// Organization role. Members carry the raw string; this is the parsed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl Role {
    pub fn can_manage_members(self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!(
                "unknown role '{other}'; expected: owner, admin, member, viewer"
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

/// Channel integrations the backend accepts. Only Twilio exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelKind {
    #[default]
    Twilio,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A voice agent as listed by `/agent/get_all_agents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "type")]
    pub agent_type: AgentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub meta_data: Value,
}

/// Credentials stored on a channel record. Either field may be withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChannelMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

/// A third-party channel integration as listed by `/channel/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta_data: ChannelMetaData,
    #[serde(
        default,
        deserialize_with = "lenient_epoch",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<i64>,
}

/// Placeholder shown when the backend withholds a channel's auth token.
pub const MASKED_TOKEN: &str = "••••••••";

/// Table-ready projection of a [`Channel`]; the item type of the channels view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRow {
    pub id: i64,
    pub name: String,
    pub auth_token: String,
    pub account_sid: String,
    pub created_at: String,
}

impl From<Channel> for ChannelRow {
    fn from(channel: Channel) -> Self {
        Self {
            id: channel.id,
            name: channel.name,
            auth_token: channel
                .meta_data
                .auth_token
                .unwrap_or_else(|| MASKED_TOKEN.to_string()),
            account_sid: channel.meta_data.account_sid.unwrap_or_default(),
            created_at: format_epoch_datetime(channel.created_at),
        }
    }
}

/// A model offered by a service provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProviderModel {
    pub id: i64,
    #[serde(default)]
    pub service_provider_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub meta_data: Option<Value>,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub created_at: Option<i64>,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub updated_at: Option<i64>,
}

/// An LLM / TTS / STT vendor available to agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub provider_type: ProviderType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub created_at: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub models: Vec<ServiceProviderModel>,
}

/// A user who belongs to the current organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub member_id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub joined_at: Option<i64>,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub last_activity_at: Option<i64>,
}

impl OrganizationMember {
    /// Full name when known, otherwise email, otherwise username.
    pub fn display_name(&self) -> String {
        let fallback = if self.email.is_empty() {
            self.username.as_str()
        } else {
            self.email.as_str()
        };
        format_display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            fallback,
        )
    }

    pub fn parsed_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// A pending (or settled) invitation into the current organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationInvite {
    pub member_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// A phone number owned by the linked Twilio account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwilioPhoneNumber {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

/// An organization the logged-in user belongs to, with their role there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMembership {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

/// Body returned by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organizations: Vec<OrganizationMembership>,
}

// ---------------------------------------------------------------------------
// Mutation payloads
// ---------------------------------------------------------------------------

/// Create (no `id`) or update (with `id`) an agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub agent_type: AgentType,
    pub meta_data: Value,
}

/// Twilio credentials sent with a channel upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwilioMetaData {
    pub account_sid: String,
    pub auth_token: String,
}

/// Create (no `id`) or update (with `id`) a channel integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelKind,
    pub meta_data: TwilioMetaData,
}

/// Features a linked number is enabled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberCapabilities {
    pub voice: bool,
    pub sms: bool,
    pub mms: bool,
}

impl Default for NumberCapabilities {
    fn default() -> Self {
        Self {
            voice: true,
            sms: false,
            mms: true,
        }
    }
}

/// Attach one telephony number to an agent through a channel integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneNumberLink {
    pub agent_id: i64,
    pub phone_number: String,
    pub phone_number_sid: String,
    pub phone_number_auth_token: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
    pub country_code: String,
    pub number_type: String,
    pub capabilities: NumberCapabilities,
    pub status: String,
}

impl PhoneNumberLink {
    /// A Twilio number, authorized with the credentials of channel `channel_id`.
    pub fn twilio(
        agent_id: i64,
        channel_id: i64,
        credentials: &TwilioMetaData,
        phone_number: &str,
    ) -> Self {
        Self {
            agent_id,
            phone_number: phone_number.trim().to_string(),
            phone_number_sid: credentials.account_sid.clone(),
            phone_number_auth_token: credentials.auth_token.clone(),
            provider: "twilio".to_string(),
            channel_id: Some(channel_id),
            country_code: "+1".to_string(),
            number_type: "international".to_string(),
            capabilities: NumberCapabilities::default(),
            status: "active".to_string(),
        }
    }
}

/// Invite someone into the current organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitePayload {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Change an existing member's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleUpdate {
    pub member_id: i64,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_epoch<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(epoch_from_value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Epoch seconds from a JSON number or a numeric string.
pub fn epoch_from_value(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
