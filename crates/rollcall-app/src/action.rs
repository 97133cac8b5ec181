//! State-update requests.
//!
//! This module defines [`StoreAction`], the typed requests handed to the
//! state container. Each action serializes as a `{"type": ..., "payload": ...}`
//! envelope so it can be logged or forwarded verbatim.
//!
//! Constructors are pure: building an action never touches state.

use serde::{Deserialize, Serialize};

use crate::state::{ChatMessage, GroupId, Member, Nickname};

/// Direction of an unseen-message counter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnseenUpdate {
    /// One more unseen message.
    Increment,
    /// All messages seen.
    Reset,
}

/// Requests consumed by [`crate::Store::reduce`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreAction {
    /// Navigation intent towards the chat view.
    RedirectUser {
        /// Whether to navigate.
        #[serde(rename = "shouldRedirectUser")]
        should_redirect: bool,
        /// Nickname the user logged in with.
        nickname: Nickname,
    },

    /// Merge members into a group, creating it on first sight.
    AddUserToGroup {
        /// Display name of the group.
        #[serde(rename = "groupName")]
        group_name: String,
        /// Target group.
        #[serde(rename = "groupId")]
        group_id: GroupId,
        /// Members to merge.
        #[serde(rename = "usersList")]
        members: Vec<Member>,
    },

    /// Remove a member from each listed group.
    RemoveUserFromGroup {
        /// Groups to remove the member from.
        #[serde(rename = "groupsList")]
        group_ids: Vec<GroupId>,
        /// Member to remove.
        nickname: Nickname,
    },

    /// Flip the collapsed flag of the conversations panel.
    ToggleCollapse,

    /// Hand a chat message to the chat room.
    UpdateChatRoom(ChatMessage),

    /// Record the session's default group unless one is already known.
    SetDefaultGroup {
        /// Candidate default group.
        #[serde(rename = "groupId")]
        group_id: GroupId,
    },

    /// Make a group the active chat context.
    #[serde(rename = "SET_ACTIVE_CHAT_STATE")]
    SetActiveChat {
        /// Group to activate.
        #[serde(rename = "groupId")]
        group_id: GroupId,
        /// Display name of the group.
        #[serde(rename = "groupName")]
        group_name: String,
    },

    /// Adjust the unseen-message counter of a group.
    #[serde(rename = "UPDATE_UNSEEN_MSG_COUNT")]
    UpdateUnseenCount {
        /// Group whose counter changes.
        #[serde(rename = "chatId")]
        group_id: GroupId,
        /// How the counter changes.
        update: UnseenUpdate,
    },
}

impl StoreAction {
    /// Navigation intent; carries no merge logic of its own.
    pub fn redirect_user(should_redirect: bool, nickname: impl Into<Nickname>) -> Self {
        Self::RedirectUser { should_redirect, nickname: nickname.into() }
    }

    /// Merge `members` into the group `group_id`.
    pub fn add_user_to_group(
        group_name: impl Into<String>,
        group_id: impl Into<GroupId>,
        members: Vec<Member>,
    ) -> Self {
        Self::AddUserToGroup { group_name: group_name.into(), group_id: group_id.into(), members }
    }

    /// Remove `nickname` from every group in `group_ids`.
    pub fn remove_user_from_group(group_ids: Vec<GroupId>, nickname: impl Into<Nickname>) -> Self {
        Self::RemoveUserFromGroup { group_ids, nickname: nickname.into() }
    }

    /// Flip the collapsed flag.
    pub fn toggle_collapse() -> Self {
        Self::ToggleCollapse
    }

    /// Pass a chat message through to the chat room.
    pub fn update_chat_room(message: ChatMessage) -> Self {
        Self::UpdateChatRoom(message)
    }

    /// Set the default group if none is set yet.
    pub fn set_default_group(group_id: impl Into<GroupId>) -> Self {
        Self::SetDefaultGroup { group_id: group_id.into() }
    }

    /// Make a group the active chat context.
    pub fn set_active_chat(group_id: impl Into<GroupId>, group_name: impl Into<String>) -> Self {
        Self::SetActiveChat { group_id: group_id.into(), group_name: group_name.into() }
    }

    /// Adjust a group's unseen-message counter.
    pub fn update_unseen_count(group_id: impl Into<GroupId>, update: UnseenUpdate) -> Self {
        Self::UpdateUnseenCount { group_id: group_id.into(), update }
    }

    /// Type tag of the action envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RedirectUser { .. } => "REDIRECT_USER",
            Self::AddUserToGroup { .. } => "ADD_USER_TO_GROUP",
            Self::RemoveUserFromGroup { .. } => "REMOVE_USER_FROM_GROUP",
            Self::ToggleCollapse => "TOGGLE_COLLAPSE",
            Self::UpdateChatRoom(_) => "UPDATE_CHAT_ROOM",
            Self::SetDefaultGroup { .. } => "SET_DEFAULT_GROUP",
            Self::SetActiveChat { .. } => "SET_ACTIVE_CHAT_STATE",
            Self::UpdateUnseenCount { .. } => "UPDATE_UNSEEN_MSG_COUNT",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn add_user_envelope_shape() {
        let action = StoreAction::add_user_to_group("General", "g1", vec![Member::new("alice")]);
        let value = serde_json::to_value(&action).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "ADD_USER_TO_GROUP",
                "payload": {
                    "groupName": "General",
                    "groupId": "g1",
                    "usersList": [{"nickname": "alice"}],
                },
            })
        );
    }

    #[test]
    fn toggle_collapse_has_no_payload() {
        let value = serde_json::to_value(StoreAction::toggle_collapse()).unwrap();
        assert_eq!(value, json!({"type": "TOGGLE_COLLAPSE"}));
    }

    #[test]
    fn update_chat_room_passes_message_through() {
        let msg = ChatMessage(json!({"from": "bob", "text": "hi"}));
        let value = serde_json::to_value(StoreAction::update_chat_room(msg)).unwrap();

        assert_eq!(value, json!({"type": "UPDATE_CHAT_ROOM", "payload": {"from": "bob", "text": "hi"}}));
    }

    #[test]
    fn kind_matches_serialized_tag() {
        let actions = [
            StoreAction::redirect_user(true, "alice"),
            StoreAction::add_user_to_group("General", "g1", vec![]),
            StoreAction::remove_user_from_group(vec!["g1".into()], "alice"),
            StoreAction::toggle_collapse(),
            StoreAction::update_chat_room(ChatMessage::default()),
            StoreAction::set_default_group("g1"),
            StoreAction::set_active_chat("g1", "General"),
            StoreAction::update_unseen_count("g1", UnseenUpdate::Reset),
        ];

        for action in actions {
            let value = serde_json::to_value(&action).unwrap();
            assert_eq!(value["type"], action.kind());
        }
    }
}
