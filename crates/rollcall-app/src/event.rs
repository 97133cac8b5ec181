//! Push events from the messaging server.
//!
//! The event bus delivers a [`RawEvent`]: an event name plus positional JSON
//! arguments. [`PushEvent`] is the validated, typed form the
//! [`crate::MembershipBridge`] works with. Decoding never panics; malformed
//! payloads surface as [`EventError`] so the caller can log and drop them.

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    EventError,
    state::{GroupId, Member, Nickname},
};

/// Inbound events the user list subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventName {
    /// Full roster of a group, sent in reply to the roster fetch.
    SetActiveUsersList,
    /// A user connected to a group.
    NewUserJoined,
    /// A user disconnected from one or more groups.
    UserDisconnected,
}

impl EventName {
    /// All events the user list subscribes to, in registration order.
    pub const ALL: [Self; 3] = [Self::SetActiveUsersList, Self::NewUserJoined, Self::UserDisconnected];

    /// Name on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetActiveUsersList => "setActiveUsersList",
            Self::NewUserJoined => "newUserJoined",
            Self::UserDisconnected => "userDisconnected",
        }
    }

    /// Parse a wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requests sent to the messaging server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundRequest {
    /// Ask for the active users of every group. Answered asynchronously by
    /// [`EventName::SetActiveUsersList`].
    GetActiveUsersList,
}

impl OutboundRequest {
    /// Name on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetActiveUsersList => "getActiveUsersList",
        }
    }
}

/// Event envelope as delivered by the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event name.
    pub event: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

impl RawEvent {
    /// Build an envelope from a known event name.
    pub fn new(event: EventName, args: Vec<Value>) -> Self {
        Self { event: event.as_str().to_owned(), args }
    }
}

/// Validated membership event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// Roster of a group.
    ActiveUsersList {
        /// Display name of the group.
        group_name: String,
        /// Group identifier.
        group_id: GroupId,
        /// Current members.
        members: Vec<Member>,
    },

    /// A user joined a group.
    UserJoined {
        /// Display name of the group.
        group_name: String,
        /// Group identifier.
        group_id: GroupId,
        /// The new member.
        member: Member,
    },

    /// A user left every listed group.
    UserDisconnected {
        /// Groups the user was a member of.
        group_ids: Vec<GroupId>,
        /// The departed user.
        nickname: Nickname,
    },
}

impl PushEvent {
    /// Event this payload was decoded from.
    pub fn name(&self) -> EventName {
        match self {
            Self::ActiveUsersList { .. } => EventName::SetActiveUsersList,
            Self::UserJoined { .. } => EventName::NewUserJoined,
            Self::UserDisconnected { .. } => EventName::UserDisconnected,
        }
    }

    /// Encode back into a bus envelope.
    pub fn to_raw(&self) -> RawEvent {
        let args = match self {
            Self::ActiveUsersList { group_name, group_id, members } => vec![
                Value::from(group_name.as_str()),
                Value::from(group_id.as_str()),
                Value::Array(members.iter().map(|m| Value::from(m.nickname.as_str())).collect()),
            ],
            Self::UserJoined { group_name, group_id, member } => vec![
                Value::from(group_name.as_str()),
                Value::from(group_id.as_str()),
                Value::from(member.nickname.as_str()),
            ],
            Self::UserDisconnected { group_ids, nickname } => vec![
                Value::Array(group_ids.iter().map(|id| Value::from(id.as_str())).collect()),
                Value::from(nickname.as_str()),
            ],
        };
        RawEvent::new(self.name(), args)
    }
}

impl TryFrom<RawEvent> for PushEvent {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let name =
            EventName::from_wire(&raw.event).ok_or_else(|| EventError::UnknownEvent(raw.event))?;
        let mut args = Args { event: name.as_str(), values: raw.args };

        match name {
            EventName::SetActiveUsersList => {
                let group_name = args.take(0, "groupName")?;
                let group_id = args.identifier(1, "groupId")?;
                let members: Vec<Member> = args.take(2, "usersList")?;
                if members.iter().any(|m| m.nickname.is_empty()) {
                    return Err(args.empty("usersList"));
                }
                Ok(Self::ActiveUsersList { group_name, group_id, members })
            },
            EventName::NewUserJoined => {
                let group_name = args.take(0, "groupName")?;
                let group_id = args.identifier(1, "groupId")?;
                let member: Member = args.take(2, "connectedUser")?;
                if member.nickname.is_empty() {
                    return Err(args.empty("connectedUser"));
                }
                Ok(Self::UserJoined { group_name, group_id, member })
            },
            EventName::UserDisconnected => {
                let group_ids: Vec<GroupId> = args.take(0, "groupsList")?;
                if group_ids.iter().any(String::is_empty) {
                    return Err(args.empty("groupsList"));
                }
                let nickname = args.identifier(1, "nickname")?;
                Ok(Self::UserDisconnected { group_ids, nickname })
            },
        }
    }
}

/// Positional argument reader for one event.
struct Args {
    event: &'static str,
    values: Vec<Value>,
}

impl Args {
    fn take<T: DeserializeOwned>(&mut self, index: usize, name: &'static str) -> Result<T, EventError> {
        let value = self
            .values
            .get_mut(index)
            .map(Value::take)
            .ok_or(EventError::MissingArgument { event: self.event, index, name })?;

        serde_json::from_value(value).map_err(|e| EventError::InvalidArgument {
            event: self.event,
            name,
            reason: e.to_string(),
        })
    }

    fn identifier(&mut self, index: usize, name: &'static str) -> Result<String, EventError> {
        let id: String = self.take(index, name)?;
        if id.is_empty() { Err(self.empty(name)) } else { Ok(id) }
    }

    fn empty(&self, name: &'static str) -> EventError {
        EventError::EmptyIdentifier { event: self.event, name }
    }
}
