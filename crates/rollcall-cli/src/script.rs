//! JSON-lines event scripts.
//!
//! Each non-empty line is either a server push envelope
//! (`{"event": "newUserJoined", "args": [...]}`) or a local UI action
//! (`{"type": "TOGGLE_COLLAPSE"}`). Lines starting with `#` are comments.

use std::io::BufRead;

use rollcall_app::{RawEvent, StoreAction};
use serde::Deserialize;

use crate::CliError;

/// One step of a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptLine {
    /// Event delivered by the server.
    Push(RawEvent),
    /// Action raised by the local UI.
    Local(StoreAction),
}

/// Parse a script, reporting the 1-based line number of the first bad line.
pub fn parse(reader: impl BufRead) -> Result<Vec<ScriptLine>, CliError> {
    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed = serde_json::from_str(trimmed)
            .map_err(|source| CliError::Parse { line: index + 1, source })?;
        lines.push(parsed);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_push_and_local_lines() {
        let script = r#"
# roster first
{"event": "setActiveUsersList", "args": ["General", "g1", ["alice"]]}
{"type": "TOGGLE_COLLAPSE"}
"#;
        let lines = parse(script.as_bytes()).unwrap();

        assert_eq!(lines, [
            ScriptLine::Push(RawEvent {
                event: "setActiveUsersList".into(),
                args: vec![json!("General"), json!("g1"), json!(["alice"])],
            }),
            ScriptLine::Local(StoreAction::toggle_collapse()),
        ]);
    }

    #[test]
    fn reports_bad_line_number() {
        let script = "{\"type\": \"TOGGLE_COLLAPSE\"}\nnot json\n";
        let err = parse(script.as_bytes()).unwrap_err();

        assert!(matches!(err, CliError::Parse { line: 2, .. }));
    }
}
