//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use super::{Invariant, InvariantKind, InvariantResult, SessionSnapshot, Violation};

/// A nickname appears at most once in each group.
///
/// Repeated join events for the same user must not grow the roster.
pub struct UniqueMembers;

impl Invariant for UniqueMembers {
    fn kind(&self) -> InvariantKind {
        InvariantKind::UniqueMembers
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        for (group_id, group) in &state.groups {
            let mut seen = HashSet::new();
            for nickname in &group.members {
                if !seen.insert(nickname) {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!("group {group_id}: duplicate member {nickname}"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The default group never changes once set.
///
/// Every observation after the first `Some` must equal it.
pub struct DefaultGroupFirstWriteWins;

impl Invariant for DefaultGroupFirstWriteWins {
    fn kind(&self) -> InvariantKind {
        InvariantKind::DefaultGroupFirstWriteWins
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let observations = state.default_history.iter().chain(std::iter::once(&state.default_group));

        let mut first: Option<&String> = None;
        for observed in observations {
            match (first, observed) {
                (None, Some(id)) => first = Some(id),
                (Some(expected), observed) if observed.as_ref() != Some(expected) => {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!("default group changed from {expected} to {observed:?}"),
                    });
                },
                _ => {},
            }
        }
        Ok(())
    }
}

/// The default group refers to a group the session knows about.
pub struct DefaultGroupKnown;

impl Invariant for DefaultGroupKnown {
    fn kind(&self) -> InvariantKind {
        InvariantKind::DefaultGroupKnown
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        match &state.default_group {
            Some(id) if !state.groups.contains_key(id) => Err(Violation {
                invariant: self.kind(),
                message: format!(
                    "default group {id} not in groups {:?}",
                    state.groups.keys().collect::<Vec<_>>()
                ),
            }),
            _ => Ok(()),
        }
    }
}

/// The active chat refers to a group the session knows about.
pub struct ActiveChatKnown;

impl Invariant for ActiveChatKnown {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ActiveChatKnown
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        match &state.active_chat {
            Some(id) if !state.groups.contains_key(id) => Err(Violation {
                invariant: self.kind(),
                message: format!(
                    "active chat {id} not in groups {:?}",
                    state.groups.keys().collect::<Vec<_>>()
                ),
            }),
            _ => Ok(()),
        }
    }
}
