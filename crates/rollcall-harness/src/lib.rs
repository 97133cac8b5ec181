//! Simulation harness for rollcall membership testing.
//!
//! # Sessions
//!
//! [`Session`] mounts a real [`rollcall_app::UserList`] over an in-process
//! hub and plays scripted server events into it, so tests exercise the same
//! bridge and store that production uses.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the
//! membership invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod session;

pub use invariants::{
    ActiveChatKnown, DefaultGroupFirstWriteWins, DefaultGroupKnown, GroupSnapshot, Invariant,
    InvariantKind, InvariantRegistry, InvariantResult, SessionSnapshot, UniqueMembers, Violation,
};
pub use session::Session;
