//! CLI error types.

use std::io;

use rollcall_app::HubError;
use thiserror::Error;

/// Errors that abort a replay.
#[derive(Debug, Error)]
pub enum CliError {
    /// I/O error reading the script or writing the report.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A script line is not valid JSON or not a known shape.
    #[error("script line {line}: {source}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// The in-process event source failed.
    #[error("event source error: {0}")]
    Hub(#[from] HubError),

    /// The report could not be serialized.
    #[error("failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}
