//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable membership state at a point in time.
//! Invariants operate on snapshots rather than the live store so that every
//! check sees one consistent view.

use std::collections::BTreeMap;

use rollcall_app::{GroupId, Nickname, ReadModel};

/// Snapshot of one session's membership state.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Known groups.
    pub groups: BTreeMap<GroupId, GroupSnapshot>,
    /// Current default group.
    pub default_group: Option<GroupId>,
    /// Current active chat group.
    pub active_chat: Option<GroupId>,
    /// Default group observed after each step, oldest first.
    pub default_history: Vec<Option<GroupId>>,
}

impl SessionSnapshot {
    /// Capture the current state of a read model.
    pub fn from_model(model: &ReadModel) -> Self {
        let groups = model
            .user_groups
            .iter()
            .map(|(id, group)| {
                let members = group.members.iter().map(|m| m.nickname.clone()).collect();
                (id.clone(), GroupSnapshot { members })
            })
            .collect();

        Self {
            groups,
            default_group: model.default_group.clone(),
            active_chat: model.active_chat.as_ref().map(|c| c.group_id.clone()),
            default_history: Vec::new(),
        }
    }

    /// Attach the default-group history recorded by the caller.
    pub fn with_history(mut self, history: impl IntoIterator<Item = Option<GroupId>>) -> Self {
        self.default_history.extend(history);
        self
    }

    /// Add a group to the snapshot.
    pub fn with_group(mut self, group_id: impl Into<GroupId>, members: &[&str]) -> Self {
        let members = members.iter().map(|&m| m.to_owned()).collect();
        self.groups.insert(group_id.into(), GroupSnapshot { members });
        self
    }

    /// Set the default group.
    pub fn with_default_group(mut self, group_id: Option<&str>) -> Self {
        self.default_group = group_id.map(str::to_owned);
        self
    }

    /// Set the active chat group.
    pub fn with_active_chat(mut self, group_id: Option<&str>) -> Self {
        self.active_chat = group_id.map(str::to_owned);
        self
    }
}

/// Snapshot of a group's roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSnapshot {
    /// Member nicknames in arrival order.
    pub members: Vec<Nickname>,
}
