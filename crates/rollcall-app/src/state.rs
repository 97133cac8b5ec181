//! Observable membership state types.
//!
//! This module defines the data structures that make up the client's read
//! model: [`Group`] rosters keyed by [`GroupId`], the session's default group,
//! the active chat context and the collapsed flag of the conversations panel.
//!
//! These structures are what a view renders from. They are only ever mutated
//! by [`crate::Store::reduce`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque group identifier assigned by the messaging server.
pub type GroupId = String;

/// User nickname. Unique within a group's member list.
pub type Nickname = String;

/// A user present in a group's roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Member {
    /// Identity of the member within a group.
    pub nickname: Nickname,
}

impl Member {
    /// Create a member with the given nickname.
    pub fn new(nickname: impl Into<Nickname>) -> Self {
        Self { nickname: nickname.into() }
    }
}

impl From<&str> for Member {
    fn from(nickname: &str) -> Self {
        Self::new(nickname)
    }
}

/// Servers send members either as a bare nickname or as a user object.
#[derive(Deserialize)]
#[serde(untagged)]
enum MemberRepr {
    Nickname(Nickname),
    Object { nickname: Nickname },
}

impl<'de> Deserialize<'de> for Member {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (MemberRepr::Nickname(nickname) | MemberRepr::Object { nickname }) =
            MemberRepr::deserialize(deserializer)?;
        Ok(Self { nickname })
    }
}

/// A named chat room with its member roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Server-assigned identifier.
    pub group_id: GroupId,
    /// Display name.
    pub group_name: String,
    /// Members in arrival order.
    pub members: Vec<Member>,
}

impl Group {
    /// Create an empty group.
    pub fn new(group_id: impl Into<GroupId>, group_name: impl Into<String>) -> Self {
        Self { group_id: group_id.into(), group_name: group_name.into(), members: Vec::new() }
    }

    /// Whether a member with this nickname is present.
    pub fn contains(&self, nickname: &str) -> bool {
        self.members.iter().any(|m| m.nickname == nickname)
    }

    /// Append members not already present, keeping arrival order.
    ///
    /// Returns the number of members actually added.
    pub fn merge_members<'a>(&mut self, members: impl IntoIterator<Item = &'a Member>) -> usize {
        let mut added = 0;
        for member in members {
            if !self.contains(&member.nickname) {
                self.members.push(member.clone());
                added += 1;
            }
        }
        added
    }

    /// Remove a member by nickname. Returns `true` if it was present.
    pub fn remove_member(&mut self, nickname: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.nickname != nickname);
        self.members.len() != before
    }

    /// Member nicknames in arrival order.
    pub fn nicknames(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.nickname.as_str())
    }
}

/// The chat context currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveChat {
    /// Group the chat belongs to.
    pub group_id: GroupId,
    /// Display name of the group.
    pub group_name: String,
}

/// Opaque chat message object passed through to the chat room view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatMessage(pub serde_json::Value);

impl ChatMessage {
    /// Group the message was posted to, if the payload names one.
    pub fn group_id(&self) -> Option<&str> {
        self.0.get("groupId").and_then(serde_json::Value::as_str)
    }
}

/// Read model rendered by the user list and its neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadModel {
    /// Conversations panel is collapsed.
    pub is_collapsed: bool,
    /// Known groups keyed by id.
    pub user_groups: BTreeMap<GroupId, Group>,
    /// Nickname of the local user.
    pub nickname: Nickname,
    /// Navigation to the chat view was requested.
    pub should_redirect: bool,
    /// Last chat message handed to the chat room.
    pub message_object: ChatMessage,
    /// First group learned about in this session. Never changes once set.
    pub default_group: Option<GroupId>,
    /// Active chat context. `None` until the roster arrives.
    pub active_chat: Option<ActiveChat>,
    /// Unseen message counters per group.
    pub unseen: BTreeMap<GroupId, u32>,
}

impl ReadModel {
    /// Empty read model for the given local nickname.
    pub fn new(nickname: impl Into<Nickname>, is_collapsed: bool) -> Self {
        Self {
            is_collapsed,
            user_groups: BTreeMap::new(),
            nickname: nickname.into(),
            should_redirect: false,
            message_object: ChatMessage::default(),
            default_group: None,
            active_chat: None,
            unseen: BTreeMap::new(),
        }
    }

    /// Look up a group by id.
    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.user_groups.get(group_id)
    }

    /// Unseen messages in a group.
    pub fn unseen_count(&self, group_id: &str) -> u32 {
        self.unseen.get(group_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_decodes_from_string_or_object() {
        let bare: Member = serde_json::from_value(serde_json::json!("alice")).unwrap();
        let object: Member =
            serde_json::from_value(serde_json::json!({"nickname": "alice", "avatar": 3})).unwrap();

        assert_eq!(bare, Member::new("alice"));
        assert_eq!(object, Member::new("alice"));
    }

    #[test]
    fn merge_skips_present_and_repeated_members() {
        let mut group = Group::new("g1", "General");
        let incoming = [Member::new("alice"), Member::new("bob"), Member::new("alice")];

        assert_eq!(group.merge_members(&incoming), 2);
        assert_eq!(group.merge_members(&incoming), 0);
        assert_eq!(group.nicknames().collect::<Vec<_>>(), ["alice", "bob"]);
    }

    #[test]
    fn remove_absent_member_is_noop() {
        let mut group = Group::new("g1", "General");
        group.merge_members(&[Member::new("alice")]);

        assert!(!group.remove_member("carol"));
        assert!(group.remove_member("alice"));
        assert!(group.members.is_empty());
    }

    #[test]
    fn chat_message_group_id() {
        let msg = ChatMessage(serde_json::json!({"groupId": "g2", "text": "hi"}));
        assert_eq!(msg.group_id(), Some("g2"));
        assert_eq!(ChatMessage::default().group_id(), None);
    }
}
