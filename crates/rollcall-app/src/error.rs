//! Error types.

use thiserror::Error;

/// Reasons a push event is rejected before it reaches the bridge.
///
/// All variants are recoverable: the event is logged and dropped, and the
/// event loop keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Event name is not one the user list subscribes to.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// A positional argument is missing.
    #[error("{event}: missing argument {index} ({name})")]
    MissingArgument {
        /// Wire name of the event.
        event: &'static str,
        /// Zero-based argument position.
        index: usize,
        /// Argument name.
        name: &'static str,
    },

    /// A positional argument has the wrong shape.
    #[error("{event}: invalid argument {name}: {reason}")]
    InvalidArgument {
        /// Wire name of the event.
        event: &'static str,
        /// Argument name.
        name: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// An identifier argument is empty.
    #[error("{event}: empty {name}")]
    EmptyIdentifier {
        /// Wire name of the event.
        event: &'static str,
        /// Argument name.
        name: &'static str,
    },
}

/// Errors raised by the in-process [`crate::Hub`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// The hub was shut down.
    #[error("hub is closed")]
    Closed,

    /// Internal lock was poisoned by a panicking holder.
    #[error("hub state poisoned")]
    Poisoned,
}
