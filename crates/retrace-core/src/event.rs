use crate::path::Key;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// InitEvent
// ---------------------------------------------------------------------------

/// Emitted once when an instrumented application starts a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitEvent {
    pub run_id: String,
    /// Epoch milliseconds, supplied by the instrumentation shim.
    pub timestamp: i64,
    /// Application state snapshot at startup.
    pub state: Value,
}

// ---------------------------------------------------------------------------
// ActionEvent
// ---------------------------------------------------------------------------

/// One dispatch step inside a run.
///
/// `call_done = false` means the currently active action called into the
/// named action (a descent). `call_done = true` means the named action
/// finished, optionally producing a `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub run_id: String,
    /// Dot-delimited qualified action name, e.g. `counter.increment`.
    /// The last segment is the leaf action name; the prefix addresses the
    /// state-tree location a completion result merges into.
    pub action: String,
    /// Argument data passed when the action started.
    #[serde(default)]
    pub payload: Value,
    pub call_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    pub timestamp: i64,
}

impl ActionEvent {
    /// State-tree location a completion result merges into: the qualified
    /// name minus its leaf segment. `"counter.increment"` targets
    /// `["counter"]`; an unqualified name targets the state root.
    pub fn target_path(&self) -> Vec<Key> {
        let mut segments: Vec<&str> = self.action.split('.').collect();
        segments.pop();
        segments.into_iter().map(Key::from).collect()
    }
}

// ---------------------------------------------------------------------------
// RuntimeEvent
// ---------------------------------------------------------------------------

/// The engine's single ingestion type, and the JSONL line format produced
/// by instrumentation shims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuntimeEvent {
    RunInit(InitEvent),
    Action(ActionEvent),
}

impl RuntimeEvent {
    pub fn run_id(&self) -> &str {
        match self {
            RuntimeEvent::RunInit(e) => &e.run_id,
            RuntimeEvent::Action(e) => &e.run_id,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            RuntimeEvent::RunInit(e) => e.timestamp,
            RuntimeEvent::Action(e) => e.timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
