//! Tone core library: domain records, errors, list normalization, session storage.
//!
//! Public API surface:
//! - [`types`]: backend records, mutation payloads, resource kinds
//! - [`error`]: [`ApiError`], [`FetchError`], [`RemoteWriteError`], [`SessionError`]
//! - [`normalize`]: lenient list-envelope handling
//! - [`format`] / [`filter`]: display helpers shared by front ends
//! - [`session`]: load / save / clear of the persisted login session

pub mod error;
pub mod filter;
pub mod format;
pub mod normalize;
pub mod paths;
pub mod session;
pub mod types;

pub use error::{ApiError, FetchError, MalformedResponse, RemoteWriteError, SessionError};
pub use session::{CurrentUser, Session};
pub use types::{
    Agent, AgentPayload, AgentType, Channel, ChannelKind, ChannelMetaData, ChannelPayload,
    ChannelRow, InvitePayload, LoginResponse, NumberCapabilities, OrganizationInvite,
    OrganizationMember, OrganizationMembership, PhoneNumberLink, ProviderType, ResourceKind,
    Role, RoleUpdate, ServiceProvider, ServiceProviderModel, TwilioMetaData, TwilioPhoneNumber,
    WriteAction,
};
