//! # tone-sync
//!
//! Client-side synchronization of remote list resources.
//!
//! Each resource (agents, channels, service providers, members, invitations)
//! has a [`RefreshCounter`], an [`AsyncView`] that re-fetches whenever the
//! counter advances, and mutation actions that write to the backend and then
//! advance the counter. A [`Store`] owns one of each and is handed to whatever
//! renders them.
//!
//! ```text
//! consumer ──subscribe──▶ AsyncView ◀──on_refresh── RefreshCounter
//!    │                        │ fetch                      ▲
//!    └──upsert/delete──▶ Resource ──write──▶ Transport      │
//!                             └───────────increment─────────┘
//! ```

pub mod counter;
pub mod endpoints;
pub mod fetcher;
pub mod gate;
pub mod mutation;
pub mod resources;
pub mod state;
pub mod store;
pub mod transport;
pub mod view;

pub use counter::RefreshCounter;
pub use fetcher::{fetcher_fn, Fetcher, FnFetcher, ListEndpoint};
pub use gate::{GateDecision, GateState, SessionGate, TokenSource, LOGIN_ROUTE};
pub use resources::{fetch_phone_numbers, Resource, DEFAULT_PHONE_PROVIDER};
pub use state::AsyncState;
pub use store::Store;
pub use transport::Transport;
pub use view::{AsyncView, ViewSubscription};
