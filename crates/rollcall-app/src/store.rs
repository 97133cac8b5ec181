//! State container.
//!
//! This module defines the [`Store`], which owns the [`ReadModel`] and applies
//! [`StoreAction`] requests to it. Reduction is pure with respect to I/O: the
//! store never talks to the event source, it only merges payloads into state.
//!
//! # Merge rules
//!
//! - Member lists are unique by nickname and keep arrival order, so replaying
//!   an add is a no-op.
//! - Removals tolerate unknown groups and absent nicknames.
//! - The default group is first-write-wins.

use tracing::debug;

use crate::{
    Dispatch, StoreAction, UnseenUpdate,
    state::{ActiveChat, Group, Nickname, ReadModel},
};

/// Initial settings of a [`Store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Nickname of the local user.
    pub nickname: Nickname,
    /// Whether the conversations panel starts collapsed.
    pub start_collapsed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { nickname: String::new(), start_collapsed: true }
    }
}

/// Holds the read model and applies state-update requests.
#[derive(Debug, Clone)]
pub struct Store {
    model: ReadModel,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Store {
    /// Create a store with an empty read model.
    pub fn new(config: StoreConfig) -> Self {
        Self { model: ReadModel::new(config.nickname, config.start_collapsed) }
    }

    /// Apply an action. Returns `true` if the read model changed.
    pub fn reduce(&mut self, action: StoreAction) -> bool {
        let kind = action.kind();
        let changed = match action {
            StoreAction::RedirectUser { should_redirect, nickname } => {
                let changed =
                    self.model.should_redirect != should_redirect || self.model.nickname != nickname;
                self.model.should_redirect = should_redirect;
                self.model.nickname = nickname;
                changed
            },
            StoreAction::AddUserToGroup { group_name, group_id, members } => {
                let created = !self.model.user_groups.contains_key(&group_id);
                let group = self
                    .model
                    .user_groups
                    .entry(group_id.clone())
                    .or_insert_with(|| Group::new(group_id, group_name.clone()));
                let renamed = group.group_name != group_name;
                group.group_name = group_name;
                let added = group.merge_members(&members);
                created || renamed || added > 0
            },
            StoreAction::RemoveUserFromGroup { group_ids, nickname } => {
                let mut removed = false;
                for group_id in &group_ids {
                    if let Some(group) = self.model.user_groups.get_mut(group_id) {
                        removed |= group.remove_member(&nickname);
                    }
                }
                removed
            },
            StoreAction::ToggleCollapse => {
                self.model.is_collapsed = !self.model.is_collapsed;
                true
            },
            StoreAction::UpdateChatRoom(message) => {
                if let Some(group_id) = message.group_id()
                    && self.model.active_chat.as_ref().is_none_or(|chat| chat.group_id != group_id)
                {
                    let count = self.model.unseen.entry(group_id.to_owned()).or_insert(0);
                    *count = count.saturating_add(1);
                }
                self.model.message_object = message;
                true
            },
            StoreAction::SetDefaultGroup { group_id } => {
                if self.model.default_group.is_none() {
                    self.model.default_group = Some(group_id);
                    true
                } else {
                    false
                }
            },
            StoreAction::SetActiveChat { group_id, group_name } => {
                let reset = self.model.unseen.remove(&group_id).is_some_and(|n| n > 0);
                let chat = ActiveChat { group_id, group_name };
                let switched = self.model.active_chat.as_ref() != Some(&chat);
                self.model.active_chat = Some(chat);
                switched || reset
            },
            StoreAction::UpdateUnseenCount { group_id, update } => match update {
                UnseenUpdate::Increment => {
                    let count = self.model.unseen.entry(group_id).or_insert(0);
                    *count = count.saturating_add(1);
                    true
                },
                UnseenUpdate::Reset => self.model.unseen.remove(&group_id).is_some_and(|n| n > 0),
            },
        };

        debug!(action = kind, changed, "reduced");
        changed
    }

    /// Current read model.
    pub fn model(&self) -> &ReadModel {
        &self.model
    }

    /// Consume the store and return its read model.
    pub fn into_model(self) -> ReadModel {
        self.model
    }
}

impl Dispatch for Store {
    fn dispatch(&mut self, action: StoreAction) {
        self.reduce(action);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::{ChatMessage, Member};

    fn members(names: &[&str]) -> Vec<Member> {
        names.iter().copied().map(Member::new).collect()
    }

    fn nicknames(store: &Store, group_id: &str) -> Vec<String> {
        store
            .model()
            .group(group_id)
            .map(|g| g.nicknames().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    #[test]
    fn add_creates_group_and_merges() {
        let mut store = Store::default();

        assert!(store.reduce(StoreAction::add_user_to_group("General", "g1", members(&["alice"]))));
        assert!(store.reduce(StoreAction::add_user_to_group("General", "g1", members(&["bob", "alice"]))));

        assert_eq!(nicknames(&store, "g1"), ["alice", "bob"]);
    }

    #[test]
    fn add_replay_is_noop() {
        let mut store = Store::default();
        let action = StoreAction::add_user_to_group("General", "g1", members(&["alice", "bob"]));

        store.reduce(action.clone());
        let once = store.model().clone();

        assert!(!store.reduce(action));
        assert_eq!(store.model(), &once);
    }

    #[test]
    fn empty_roster_creates_empty_group() {
        let mut store = Store::default();
        store.reduce(StoreAction::add_user_to_group("Lobby", "g9", vec![]));

        assert_eq!(store.model().group("g9").map(|g| g.members.len()), Some(0));
    }

    #[test]
    fn remove_spans_groups_and_keeps_empty_groups() {
        let mut store = Store::default();
        store.reduce(StoreAction::add_user_to_group("General", "g1", members(&["alice", "bob"])));
        store.reduce(StoreAction::add_user_to_group("Random", "g2", members(&["alice"])));

        assert!(store.reduce(StoreAction::remove_user_from_group(
            vec!["g1".into(), "g2".into(), "missing".into()],
            "alice"
        )));

        assert_eq!(nicknames(&store, "g1"), ["bob"]);
        assert!(nicknames(&store, "g2").is_empty());
        assert!(store.model().group("g2").is_some());
    }

    #[test]
    fn remove_absent_nickname_is_noop() {
        let mut store = Store::default();
        store.reduce(StoreAction::add_user_to_group("General", "g1", members(&["alice"])));
        let before = store.model().clone();

        assert!(!store.reduce(StoreAction::remove_user_from_group(vec!["g1".into()], "zed")));
        assert_eq!(store.model(), &before);
    }

    #[test]
    fn toggle_collapse_twice_restores_flag() {
        let mut store = Store::default();
        let initial = store.model().is_collapsed;

        store.reduce(StoreAction::toggle_collapse());
        assert_ne!(store.model().is_collapsed, initial);
        store.reduce(StoreAction::toggle_collapse());
        assert_eq!(store.model().is_collapsed, initial);
    }

    #[test]
    fn default_group_is_first_write_wins() {
        let mut store = Store::default();

        assert!(store.reduce(StoreAction::set_default_group("g1")));
        assert!(!store.reduce(StoreAction::set_default_group("g2")));
        assert_eq!(store.model().default_group.as_deref(), Some("g1"));
    }

    #[test]
    fn redirect_records_nickname() {
        let mut store = Store::default();
        store.reduce(StoreAction::redirect_user(true, "alice"));

        assert!(store.model().should_redirect);
        assert_eq!(store.model().nickname, "alice");
    }

    #[test]
    fn chat_message_counts_unseen_outside_active_chat() {
        let mut store = Store::default();
        store.reduce(StoreAction::set_active_chat("g1", "General"));

        store.reduce(StoreAction::update_chat_room(ChatMessage(json!({"groupId": "g1"}))));
        store.reduce(StoreAction::update_chat_room(ChatMessage(json!({"groupId": "g2"}))));
        store.reduce(StoreAction::update_chat_room(ChatMessage(json!({"groupId": "g2"}))));

        assert_eq!(store.model().unseen_count("g1"), 0);
        assert_eq!(store.model().unseen_count("g2"), 2);
        assert_eq!(store.model().message_object, ChatMessage(json!({"groupId": "g2"})));

        store.reduce(StoreAction::set_active_chat("g2", "Random"));
        assert_eq!(store.model().unseen_count("g2"), 0);
    }

    #[test]
    fn unseen_counter_updates() {
        let mut store = Store::default();

        store.reduce(StoreAction::update_unseen_count("g1", UnseenUpdate::Increment));
        store.reduce(StoreAction::update_unseen_count("g1", UnseenUpdate::Increment));
        assert_eq!(store.model().unseen_count("g1"), 2);

        assert!(store.reduce(StoreAction::update_unseen_count("g1", UnseenUpdate::Reset)));
        assert!(!store.reduce(StoreAction::update_unseen_count("g1", UnseenUpdate::Reset)));
        assert_eq!(store.model().unseen_count("g1"), 0);
    }
}
