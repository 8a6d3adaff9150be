//! Process-wide map from run id to run, in insertion order.

use crate::error::{Result, RetraceError};
use crate::event::{ActionEvent, InitEvent};
use crate::run::Run;
use crate::tree::{self, ActionNode};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Owns every recorded run. Unbounded unless runs are explicitly deleted;
/// there is no implicit eviction. All mutation replaces the entry for a
/// run id with a newly computed `Arc<Run>`, so readers holding a prior
/// snapshot are never affected.
#[derive(Debug, Default)]
pub struct RunRegistry {
    runs: HashMap<String, Arc<Run>>,
    order: Vec<String>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh run, overwriting any prior run with the same id
    /// (keeping its position in the listing order). Returns the synthetic
    /// initial-state node.
    pub fn on_run_initialized(&mut self, event: &InitEvent) -> Arc<ActionNode> {
        let (run, root) = Run::initialize(event);
        if self.runs.insert(event.run_id.clone(), run).is_none() {
            self.order.push(event.run_id.clone());
        }
        root
    }

    /// Route an action event to its run. A missing run is a consistency
    /// fault in the event stream: logged and ignored. Returns the node the
    /// presentation layer should select, if the event applied.
    pub fn on_action_event(&mut self, event: &ActionEvent) -> Result<Option<Arc<ActionNode>>> {
        let Some(run) = self.runs.get(&event.run_id) else {
            warn!(
                run = %event.run_id,
                action = %event.action,
                "action event for an unknown run; event dropped"
            );
            return Ok(None);
        };
        let (updated, selected) = Run::append(run, event)?;
        self.runs.insert(event.run_id.clone(), updated);
        Ok(selected)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Run>> {
        self.runs.get(id)
    }

    /// Runs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Run>> {
        self.order.iter().filter_map(|id| self.runs.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Flip the run-level collapsed flag.
    pub fn toggle_run(&mut self, id: &str) -> Result<()> {
        let run = self
            .runs
            .get(id)
            .ok_or_else(|| RetraceError::RunNotFound(id.to_string()))?;
        let toggled = Arc::new(Run {
            collapsed: !run.collapsed,
            ..run.as_ref().clone()
        });
        self.runs.insert(id.to_string(), toggled);
        Ok(())
    }

    /// Flip the collapsed flag on the node addressed by `indexes`: the
    /// first index selects the top-level action, the rest descend through
    /// children. Rebuilds only the spine.
    pub fn toggle_action(&mut self, id: &str, indexes: &[usize]) -> Result<()> {
        let run = self
            .runs
            .get(id)
            .ok_or_else(|| RetraceError::RunNotFound(id.to_string()))?;
        let (&top, rest) = indexes
            .split_first()
            .ok_or(RetraceError::NodeNotFound { path: Vec::new() })?;
        let node = run
            .actions
            .get(top)
            .ok_or_else(|| RetraceError::NodeNotFound {
                path: indexes.to_vec(),
            })?;
        let toggled = tree::toggle_collapsed(node, rest)?;
        let mut actions = run.actions.clone();
        actions[top] = toggled;
        let updated = Arc::new(Run {
            actions,
            ..run.as_ref().clone()
        });
        self.runs.insert(id.to_string(), updated);
        Ok(())
    }

    /// Remove a run. No cascading effects. Returns whether it existed.
    pub fn delete_run(&mut self, id: &str) -> bool {
        let removed = self.runs.remove(id).is_some();
        if removed {
            self.order.retain(|run_id| run_id != id);
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
