//! The call-tree fold: one incoming action event against one action node.
//!
//! Nodes are persistent. Folding an event never mutates an existing node;
//! it rebuilds the spine from the affected node up and shares every
//! untouched branch. A fold that changes nothing returns the input `Arc`
//! itself, so callers can detect no-ops with `Arc::ptr_eq`.

use crate::error::{Result, RetraceError};
use crate::event::ActionEvent;
use crate::path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

// ---------------------------------------------------------------------------
// ActionNode
// ---------------------------------------------------------------------------

/// One action invocation in a run's call tree.
///
/// Invariants:
/// - while `done` is false, at most the last child may itself be not done;
/// - once `done` is true, the node and its subtree never change again;
/// - `result` and `next_state` are present only when `done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionNode {
    /// Full qualified action name, e.g. `counter.increment`.
    pub name: String,
    pub done: bool,
    /// Presentation hint only; no structural meaning.
    pub collapsed: bool,
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Application state snapshot immediately before this action ran.
    /// `Null` for the synthetic initial-state node.
    pub previous_state: Arc<Value>,
    /// Application state snapshot immediately after completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_state: Option<Arc<Value>>,
    /// Nested invocations in call order, append-only while not done.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<ActionNode>>,
}

impl ActionNode {
    /// A freshly started, not-yet-done invocation.
    pub fn pending(name: &str, payload: Value, previous_state: Arc<Value>) -> Self {
        ActionNode {
            name: name.to_string(),
            done: false,
            collapsed: false,
            payload,
            result: None,
            previous_state,
            next_state: None,
            children: Vec::new(),
        }
    }

    /// The synthetic done node every run starts with, recording the
    /// initial state snapshot.
    pub fn initial(state: Arc<Value>) -> Self {
        ActionNode {
            name: "Initial State".to_string(),
            done: true,
            collapsed: false,
            payload: Value::Null,
            result: None,
            previous_state: Arc::new(Value::Null),
            next_state: Some(state),
            children: Vec::new(),
        }
    }

    /// A node is active when the next event applies to it directly:
    /// it is not done and has no still-open nested call.
    pub fn is_active(&self) -> bool {
        !self.done && self.children.last().map_or(true, |last| last.done)
    }
}

// ---------------------------------------------------------------------------
// Fold
// ---------------------------------------------------------------------------

/// Fold one action event into a node's subtree, returning the new subtree
/// root. Returns the input `Arc` unchanged when the event does not apply
/// (done node, or an inconsistent completion that gets dropped).
pub fn apply(node: &Arc<ActionNode>, event: &ActionEvent) -> Result<Arc<ActionNode>> {
    if node.done {
        // done subtrees are frozen; routing should never send events here
        return Ok(Arc::clone(node));
    }

    match node.children.last() {
        // an earlier nested call is still open: the event belongs below
        Some(last) if !last.done => {
            let folded = apply(last, event)?;
            if Arc::ptr_eq(&folded, last) {
                return Ok(Arc::clone(node));
            }
            let mut children = node.children.clone();
            let slot = children.len() - 1;
            children[slot] = folded;
            Ok(Arc::new(ActionNode {
                children,
                ..node.as_ref().clone()
            }))
        }
        // this node is the active one
        _ => {
            if !event.call_done {
                // the active action called into a nested action
                let child = ActionNode::pending(
                    &event.action,
                    event.payload.clone(),
                    Arc::clone(&node.previous_state),
                );
                let mut children = node.children.clone();
                children.push(Arc::new(child));
                Ok(Arc::new(ActionNode {
                    children,
                    ..node.as_ref().clone()
                }))
            } else if node.name == event.action {
                // the active action finished: freeze it and replay the result
                let next_state = merge_result(&node.previous_state, event)?;
                Ok(Arc::new(ActionNode {
                    done: true,
                    result: event.result.clone(),
                    next_state: Some(next_state),
                    ..node.as_ref().clone()
                }))
            } else {
                warn!(
                    active = %node.name,
                    action = %event.action,
                    "completion does not name the active action; event dropped"
                );
                Ok(Arc::clone(node))
            }
        }
    }
}

/// Replay a completion's effect on a state snapshot: merge `result` at the
/// location implied by the qualified action name. Without a result the
/// snapshot is shared unchanged.
pub fn merge_result(state: &Arc<Value>, event: &ActionEvent) -> Result<Arc<Value>> {
    match &event.result {
        Some(result) => {
            let merged = path::merge_at(state, &event.target_path(), result)?;
            Ok(Arc::new(merged))
        }
        None => Ok(Arc::clone(state)),
    }
}

/// Flip `collapsed` on the node addressed by child indexes, rebuilding only
/// the spine. An empty path addresses `node` itself.
pub fn toggle_collapsed(node: &Arc<ActionNode>, indexes: &[usize]) -> Result<Arc<ActionNode>> {
    match indexes.split_first() {
        None => Ok(Arc::new(ActionNode {
            collapsed: !node.collapsed,
            ..node.as_ref().clone()
        })),
        Some((&index, rest)) => {
            let child = node
                .children
                .get(index)
                .ok_or_else(|| RetraceError::NodeNotFound {
                    path: indexes.to_vec(),
                })?;
            let toggled = toggle_collapsed(child, rest)?;
            let mut children = node.children.clone();
            children[index] = toggled;
            Ok(Arc::new(ActionNode {
                children,
                ..node.as_ref().clone()
            }))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
