//! Render-ready projection of the read model.

use serde::Serialize;

use crate::state::{GroupId, ReadModel};

/// One group row of the conversations panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    /// Group identifier.
    pub group_id: GroupId,
    /// Display name.
    pub group_name: String,
    /// Member nicknames in arrival order.
    pub members: Vec<String>,
    /// This is the session's default group.
    pub is_default: bool,
    /// This is the active chat context.
    pub is_active: bool,
    /// Unseen messages.
    pub unseen: u32,
}

/// Everything the conversations panel needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListView {
    /// Dim overlay behind the open panel is shown.
    pub overlay_visible: bool,
    /// Panel is expanded.
    pub panel_open: bool,
    /// Nickname of the local user.
    pub nickname: String,
    /// Default group first, then the rest by id.
    pub groups: Vec<GroupView>,
}

impl UserListView {
    /// Project the read model.
    pub fn project(model: &ReadModel) -> Self {
        let default = model.default_group.as_deref();
        let active = model.active_chat.as_ref().map(|c| c.group_id.as_str());

        let mut groups: Vec<GroupView> = model
            .user_groups
            .values()
            .map(|group| GroupView {
                group_id: group.group_id.clone(),
                group_name: group.group_name.clone(),
                members: group.nicknames().map(str::to_owned).collect(),
                is_default: default == Some(group.group_id.as_str()),
                is_active: active == Some(group.group_id.as_str()),
                unseen: model.unseen_count(&group.group_id),
            })
            .collect();
        // Stable sort keeps the BTreeMap id order for the rest.
        groups.sort_by_key(|g| !g.is_default);

        Self {
            overlay_visible: !model.is_collapsed,
            panel_open: !model.is_collapsed,
            nickname: model.nickname.clone(),
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreAction, state::Member};

    #[test]
    fn default_group_is_listed_first() {
        let mut store = Store::default();
        store.reduce(StoreAction::set_default_group("g2"));
        store.reduce(StoreAction::add_user_to_group("Alpha", "g1", vec![Member::new("alice")]));
        store.reduce(StoreAction::add_user_to_group("Beta", "g2", vec![Member::new("bob")]));
        store.reduce(StoreAction::add_user_to_group("Gamma", "g3", vec![]));

        let view = UserListView::project(store.model());
        let ids: Vec<_> = view.groups.iter().map(|g| g.group_id.as_str()).collect();

        assert_eq!(ids, ["g2", "g1", "g3"]);
        assert!(view.groups[0].is_default);
    }

    #[test]
    fn collapsed_panel_hides_overlay() {
        let mut store = Store::default();
        assert!(!UserListView::project(store.model()).panel_open);

        store.reduce(StoreAction::toggle_collapse());
        let view = UserListView::project(store.model());
        assert!(view.panel_open && view.overlay_visible);
    }
}
