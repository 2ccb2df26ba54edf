//! Inbound Endpoint shapes (C7/C8) — protocol-specific listeners that
//! feed messages into a named sequence.

use sy_common::Position;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionAfterProcess {
    Delete,
    Move,
}

impl ActionAfterProcess {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DELETE" => Some(ActionAfterProcess::Delete),
            "MOVE" => Some(ActionAfterProcess::Move),
            _ => None,
        }
    }
}

/// Parameters of a `file://` poller, parsed from `<parameters>` under a
/// `<inboundEndpoint protocol="file">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePollerParams {
    pub interval: Duration,
    pub file_uri: String,
    pub content_type: String,
    pub file_name_pattern: String,
    pub sequential: bool,
    pub coordination: bool,
    pub action_after_process: ActionAfterProcess,
    pub action_after_failure: ActionAfterProcess,
    pub move_after_process: Option<String>,
    pub move_after_failure: Option<String>,
    /// Seconds a `.lock` file may age before a poller reclaims it as
    /// abandoned. `None` (parsed from `-1`) disables reclaim entirely.
    pub auto_lock_release_interval: Option<Duration>,
}

impl Default for FilePollerParams {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            file_uri: String::new(),
            content_type: "text/plain".to_string(),
            file_name_pattern: ".*".to_string(),
            sequential: true,
            coordination: true,
            action_after_process: ActionAfterProcess::Delete,
            action_after_failure: ActionAfterProcess::Delete,
            move_after_process: None,
            move_after_failure: None,
            auto_lock_release_interval: Some(Duration::from_secs(10)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundProtocol {
    Http,
    File(FilePollerParams),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub name: String,
    pub sequence_ref: String,
    pub protocol: InboundProtocol,
    pub position: Position,
}
