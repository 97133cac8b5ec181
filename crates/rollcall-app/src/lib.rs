//! Membership state for the rollcall chat client
//!
//! Pure state transitions and an injected-transport event loop for the
//! conversations panel: which groups exist, who is in them, which group is
//! the session default, and whether the panel is collapsed.
//!
//! # Components
//!
//! - [`StoreAction`]: Typed state-update requests
//! - [`Store`]: State container applying actions to the [`ReadModel`]
//! - [`MembershipBridge`]: Translates server push events into actions
//! - [`EventSource`]: Trait for the real-time transport
//! - [`Hub`]: In-process event source
//! - [`UserList`]: Event loop wiring a source, the bridge and a dispatcher

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod bridge;
mod error;
mod event;
mod hub;
mod runtime;
mod source;
mod state;
mod store;
mod view;

pub use action::{StoreAction, UnseenUpdate};
pub use bridge::{BridgeStats, MembershipBridge};
pub use error::{EventError, HubError};
pub use event::{EventName, OutboundRequest, PushEvent, RawEvent};
pub use hub::Hub;
pub use runtime::UserList;
pub use source::{Dispatch, EventSink, EventSource, Subscription};
pub use state::{ActiveChat, ChatMessage, Group, GroupId, Member, Nickname, ReadModel};
pub use store::{Store, StoreConfig};
pub use view::{GroupView, UserListView};
