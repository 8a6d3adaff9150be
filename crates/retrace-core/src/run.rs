//! Per-run aggregate: the ordered list of top-level action invocations.

use crate::error::Result;
use crate::event::{ActionEvent, InitEvent};
use crate::tree::{self, ActionNode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// One recorded execution trace. The action list only grows at the tail;
/// entries become immutable once done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    /// Epoch milliseconds at which the run started.
    pub timestamp: i64,
    /// Top-level action invocations, oldest first. The first entry is the
    /// synthetic initial-state node.
    pub actions: Vec<Arc<ActionNode>>,
    /// Presentation hint only.
    pub collapsed: bool,
}

impl Run {
    /// Build a fresh run from its init event: one synthetic done node
    /// holding the initial state snapshot. Also returns that node so the
    /// caller can select it.
    pub fn initialize(event: &InitEvent) -> (Arc<Run>, Arc<ActionNode>) {
        let root = Arc::new(ActionNode::initial(Arc::new(event.state.clone())));
        let run = Arc::new(Run {
            id: event.run_id.clone(),
            timestamp: event.timestamp,
            actions: vec![Arc::clone(&root)],
            collapsed: false,
        });
        (run, root)
    }

    /// Fold one action event into the run. Returns the new run (the input
    /// `Arc` itself when the event was dropped) and the node the
    /// presentation layer should now select.
    pub fn append(
        run: &Arc<Run>,
        event: &ActionEvent,
    ) -> Result<(Arc<Run>, Option<Arc<ActionNode>>)> {
        let Some(last) = run.actions.last() else {
            // initialize always seeds one node; an empty run is a fault
            warn!(run = %run.id, "run has no actions; event dropped");
            return Ok((Arc::clone(run), None));
        };

        if last.done {
            if event.call_done {
                warn!(
                    run = %run.id,
                    action = %event.action,
                    "completion with no active top-level action; event dropped"
                );
                return Ok((Arc::clone(run), None));
            }
            // new top-level invocation, starting from where the last ended
            let node = Arc::new(ActionNode::pending(
                &event.action,
                event.payload.clone(),
                last.next_state.clone().unwrap_or_default(),
            ));
            let mut actions = run.actions.clone();
            actions.push(Arc::clone(&node));
            let updated = Arc::new(Run {
                actions,
                ..run.as_ref().clone()
            });
            return Ok((updated, Some(node)));
        }

        let folded = tree::apply(last, event)?;
        if Arc::ptr_eq(&folded, last) {
            return Ok((Arc::clone(run), Some(folded)));
        }
        let mut actions = run.actions.clone();
        let slot = actions.len() - 1;
        actions[slot] = Arc::clone(&folded);
        let updated = Arc::new(Run {
            actions,
            ..run.as_ref().clone()
        });
        Ok((updated, Some(folded)))
    }

    /// Final state of the run so far: the `next_state` of the last done
    /// top-level action.
    pub fn latest_state(&self) -> Option<&Arc<serde_json::Value>> {
        self.actions
            .iter()
            .rev()
            .find_map(|action| action.next_state.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
