//! Replay tool for rollcall membership state
//!
//! A thin shell over [`rollcall_app::UserList`] that feeds a JSON-lines script
//! of server push events and local UI actions through an in-process
//! [`rollcall_app::Hub`] and reports the resulting read model.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
pub mod replay;
pub mod script;

pub use error::CliError;
pub use replay::{Report, ReplayConfig, replay};
pub use script::{ScriptLine, parse};
