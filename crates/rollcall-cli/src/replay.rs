//! Script replay through a mounted user list.

use rollcall_app::{
    BridgeStats, Hub, OutboundRequest, ReadModel, Store, StoreConfig, UserList, UserListView,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{CliError, ScriptLine};

/// Settings for one replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Nickname of the local user.
    pub nickname: String,
    /// Start with the conversations panel expanded.
    pub expanded: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { nickname: "anonymous".into(), expanded: false }
    }
}

impl From<&ReplayConfig> for StoreConfig {
    fn from(config: &ReplayConfig) -> Self {
        Self { nickname: config.nickname.clone(), start_collapsed: !config.expanded }
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Requests the user list sent to the server, by wire name.
    pub requests: Vec<&'static str>,
    /// Events handled by the bridge.
    pub handled: u64,
    /// Events dropped as malformed.
    pub dropped: u64,
    /// Render-ready view.
    pub view: UserListView,
    /// Full read model.
    pub model: ReadModel,
}

impl Report {
    fn new(requests: &[OutboundRequest], stats: BridgeStats, model: ReadModel) -> Self {
        Self {
            requests: requests.iter().map(|r| r.as_str()).collect(),
            handled: stats.handled,
            dropped: stats.dropped,
            view: UserListView::project(&model),
            model,
        }
    }
}

/// Mount a user list, play the script into it and collect the final state.
///
/// Server events are queued on the hub; a local action first drains the
/// queue so it observes every event before it. Once the script ends the hub
/// is closed and the user list runs until its inbox is empty.
pub async fn replay(config: &ReplayConfig, script: Vec<ScriptLine>) -> Result<Report, CliError> {
    let hub = Hub::new();
    let mut list = UserList::mount(hub.clone(), Store::new(config.into()))?;
    info!(steps = script.len(), nickname = %config.nickname, "replaying script");

    for line in script {
        match line {
            ScriptLine::Push(raw) => {
                let reached = hub.publish(raw)?;
                debug!(reached, "published");
            },
            ScriptLine::Local(action) => {
                list.pump();
                list.dispatcher_mut().reduce(action);
            },
        }
    }

    hub.close()?;
    list.run().await;

    let requests = hub.take_requests()?;
    let stats = list.stats();
    let (_, store) = list.unmount();
    Ok(Report::new(&requests, stats, store.into_model()))
}

#[cfg(test)]
mod tests {
    use rollcall_app::{EventName, RawEvent, StoreAction};
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn local_action_sees_earlier_events() {
        let script = vec![
            ScriptLine::Push(RawEvent::new(EventName::SetActiveUsersList, vec![
                json!("General"),
                json!("g1"),
                json!(["alice"]),
            ])),
            ScriptLine::Local(StoreAction::toggle_collapse()),
            ScriptLine::Push(RawEvent::new(EventName::NewUserJoined, vec![
                json!("General"),
                json!("g1"),
                json!("bob"),
            ])),
        ];

        let report = replay(&ReplayConfig::default(), script).await.unwrap();

        assert_eq!(report.requests, ["getActiveUsersList"]);
        assert_eq!(report.handled, 2);
        assert!(report.view.panel_open);
        assert_eq!(report.view.groups[0].members, ["alice", "bob"]);
    }
}
