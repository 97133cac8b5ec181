//! Push-event to store-action translation layer.
//!
//! The [`MembershipBridge`] adapts server push events to the state
//! container's vocabulary.
//!
//! # Responsibilities
//!
//! - Converts each [`crate::PushEvent`] into the [`crate::StoreAction`]s that
//!   describe it. It never reads or writes state itself.
//! - Requests default-group bookkeeping on every roster and join event; the
//!   store keeps only the first one.
//! - Names the single outbound request issued when the user list mounts.
//! - Decodes raw bus envelopes, dropping malformed ones with a warning.

use tracing::{debug, warn};

use crate::{OutboundRequest, PushEvent, RawEvent, StoreAction};

/// Counters for events seen by a [`MembershipBridge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Events translated into actions.
    pub handled: u64,
    /// Events dropped because their payload was malformed.
    pub dropped: u64,
}

/// Bridge between the push-event source and the state container.
#[derive(Debug, Clone, Default)]
pub struct MembershipBridge {
    stats: BridgeStats,
}

impl MembershipBridge {
    /// Create a new bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request issued exactly once when the user list mounts.
    pub fn startup_request(&self) -> OutboundRequest {
        OutboundRequest::GetActiveUsersList
    }

    /// Translate a push event into store actions.
    pub fn handle(&mut self, event: PushEvent) -> Vec<StoreAction> {
        self.stats.handled += 1;

        match event {
            PushEvent::ActiveUsersList { group_name, group_id, members } => {
                debug!(%group_id, members = members.len(), "active users list");
                vec![
                    StoreAction::set_default_group(group_id.clone()),
                    StoreAction::add_user_to_group(group_name.clone(), group_id.clone(), members),
                    StoreAction::set_active_chat(group_id, group_name),
                ]
            },
            PushEvent::UserJoined { group_name, group_id, member } => {
                debug!(%group_id, nickname = %member.nickname, "user joined");
                vec![
                    StoreAction::set_default_group(group_id.clone()),
                    StoreAction::add_user_to_group(group_name, group_id, vec![member]),
                ]
            },
            PushEvent::UserDisconnected { group_ids, nickname } => {
                debug!(%nickname, groups = group_ids.len(), "user disconnected");
                vec![StoreAction::remove_user_from_group(group_ids, nickname)]
            },
        }
    }

    /// Decode and translate a raw bus envelope.
    ///
    /// Malformed payloads are logged and produce no actions.
    pub fn handle_raw(&mut self, raw: RawEvent) -> Vec<StoreAction> {
        match PushEvent::try_from(raw) {
            Ok(event) => self.handle(event),
            Err(e) => {
                self.stats.dropped += 1;
                warn!(error = %e, "dropping malformed push event");
                vec![]
            },
        }
    }

    /// Event counters.
    pub fn stats(&self) -> BridgeStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{EventName, state::Member};

    #[test]
    fn roster_sets_default_merges_and_activates() {
        let mut bridge = MembershipBridge::new();
        let actions = bridge.handle(PushEvent::ActiveUsersList {
            group_name: "General".into(),
            group_id: "g1".into(),
            members: vec![Member::new("alice")],
        });

        assert_eq!(actions, [
            StoreAction::set_default_group("g1"),
            StoreAction::add_user_to_group("General", "g1", vec![Member::new("alice")]),
            StoreAction::set_active_chat("g1", "General"),
        ]);
    }

    #[test]
    fn join_appends_single_member() {
        let mut bridge = MembershipBridge::new();
        let actions = bridge.handle(PushEvent::UserJoined {
            group_name: "General".into(),
            group_id: "g1".into(),
            member: Member::new("bob"),
        });

        assert!(matches!(actions.as_slice(), [
            StoreAction::SetDefaultGroup { .. },
            StoreAction::AddUserToGroup { members, .. },
        ] if members == &[Member::new("bob")]));
    }

    #[test]
    fn disconnect_has_no_default_group_side_effect() {
        let mut bridge = MembershipBridge::new();
        let actions = bridge.handle(PushEvent::UserDisconnected {
            group_ids: vec!["g1".into()],
            nickname: "alice".into(),
        });

        assert_eq!(actions, [StoreAction::remove_user_from_group(vec!["g1".into()], "alice")]);
    }

    #[test]
    fn malformed_raw_event_is_dropped() {
        let mut bridge = MembershipBridge::new();
        let raw = RawEvent::new(EventName::NewUserJoined, vec![json!(42)]);

        assert!(bridge.handle_raw(raw).is_empty());
        assert_eq!(bridge.stats(), BridgeStats { handled: 0, dropped: 1 });
    }

    #[test]
    fn startup_request_is_roster_fetch() {
        let bridge = MembershipBridge::new();
        assert_eq!(bridge.startup_request(), OutboundRequest::GetActiveUsersList);
        assert_eq!(bridge.startup_request().as_str(), "getActiveUsersList");
    }
}
