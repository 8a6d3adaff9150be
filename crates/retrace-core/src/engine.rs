//! The engine facade: one explicit store object owning the run registry,
//! the selection, the raw event journal, and the presentation settings.
//!
//! Single-threaded, event-at-a-time: every event is fully applied before
//! the next is considered. All tree mutation happens by replacing a run's
//! entry with a newly computed value, so any snapshot a reader holds stays
//! valid for time-travel and diffing.

use crate::error::Result;
use crate::event::{ActionEvent, InitEvent, RuntimeEvent};
use crate::registry::RunRegistry;
use crate::run::Run;
use crate::tree::ActionNode;
use crate::view::{PaneDisplay, ValueDisplay, ViewState};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Devtools {
    registry: RunRegistry,
    selected: Option<Arc<ActionNode>>,
    events: Vec<RuntimeEvent>,
    view: ViewState,
}

impl Devtools {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Ingestion
    // -----------------------------------------------------------------------

    /// Journal and route one runtime event.
    pub fn dispatch(&mut self, event: RuntimeEvent) -> Result<()> {
        self.events.push(event.clone());
        match event {
            RuntimeEvent::RunInit(init) => {
                self.run_initialized(&init);
                Ok(())
            }
            RuntimeEvent::Action(action) => self.action_event(&action),
        }
    }

    /// Start (or restart) a run and select its initial-state node.
    pub fn run_initialized(&mut self, event: &InitEvent) {
        debug!(run = %event.run_id, "run initialized");
        let root = self.registry.on_run_initialized(event);
        self.selected = Some(root);
    }

    /// Fold one action event into its run. Dropped events (unknown run,
    /// inconsistent completion) leave the selection untouched.
    pub fn action_event(&mut self, event: &ActionEvent) -> Result<()> {
        debug!(run = %event.run_id, action = %event.action, call_done = event.call_done, "action event");
        if let Some(node) = self.registry.on_action_event(event)? {
            self.selected = Some(node);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn get_run(&self, id: &str) -> Option<Arc<Run>> {
        self.registry.get(id).cloned()
    }

    /// All runs, in insertion order.
    pub fn runs(&self) -> Vec<Arc<Run>> {
        self.registry.iter().cloned().collect()
    }

    pub fn selected(&self) -> Option<Arc<ActionNode>> {
        self.selected.clone()
    }

    /// Raw journal of every event dispatched through [`Devtools::dispatch`].
    pub fn events(&self) -> &[RuntimeEvent] {
        &self.events
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    // -----------------------------------------------------------------------
    // Presentation-only mutation
    // -----------------------------------------------------------------------

    pub fn set_selected(&mut self, node: Option<Arc<ActionNode>>) {
        self.selected = node;
    }

    pub fn show_pane(&mut self, shown: bool) {
        self.view.pane_shown = shown;
    }

    pub fn set_pane_display(&mut self, display: PaneDisplay) {
        self.view.pane_display = display;
    }

    pub fn set_value_display(&mut self, display: ValueDisplay) {
        self.view.value_display = display;
    }

    pub fn toggle_collapse_repeating_actions(&mut self) {
        self.view.collapse_repeating_actions = !self.view.collapse_repeating_actions;
    }

    pub fn toggle_run(&mut self, id: &str) -> Result<()> {
        self.registry.toggle_run(id)
    }

    pub fn toggle_action(&mut self, id: &str, indexes: &[usize]) -> Result<()> {
        self.registry.toggle_action(id, indexes)
    }

    /// Remove a run and drop the selection if it pointed into it.
    pub fn delete_run(&mut self, id: &str) -> bool {
        let removed = self.registry.delete_run(id);
        if removed {
            self.selected = None;
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn init(run_id: &str, state: Value) -> RuntimeEvent {
        RuntimeEvent::RunInit(InitEvent {
            run_id: run_id.to_string(),
            timestamp: 1000,
            state,
        })
    }

    fn action(
        run_id: &str,
        name: &str,
        call_done: bool,
        result: Option<Value>,
    ) -> RuntimeEvent {
        RuntimeEvent::Action(ActionEvent {
            run_id: run_id.to_string(),
            action: name.to_string(),
            payload: json!({}),
            call_done,
            result,
            timestamp: 1001,
        })
    }

    #[test]
    fn increment_scenario_end_to_end() {
        let mut devtools = Devtools::new();
        devtools.dispatch(init("r1", json!({"count": 0}))).unwrap();
        devtools
            .dispatch(action("r1", "increment", false, None))
            .unwrap();
        devtools
            .dispatch(action("r1", "increment.inner", false, None))
            .unwrap();
        devtools
            .dispatch(action("r1", "increment.inner", true, None))
            .unwrap();
        devtools
            .dispatch(action("r1", "increment", true, Some(json!({"count": 1}))))
            .unwrap();

        let run = devtools.get_run("r1").unwrap();
        assert_eq!(run.actions.len(), 2);

        let increment = &run.actions[1];
        assert!(increment.done);
        assert_eq!(increment.children.len(), 1);
        assert!(increment.children[0].done);
        assert_eq!(increment.children[0].name, "increment.inner");
        assert_eq!(
            increment.next_state.as_ref().unwrap().as_ref(),
            &json!({"count": 1})
        );
        assert_eq!(run.latest_state().unwrap().as_ref(), &json!({"count": 1}));
    }

    #[test]
    fn selection_follows_the_fold() {
        let mut devtools = Devtools::new();
        devtools.dispatch(init("r1", json!({}))).unwrap();
        // init selects the synthetic node
        assert_eq!(devtools.selected().unwrap().name, "Initial State");

        devtools
            .dispatch(action("r1", "increment", false, None))
            .unwrap();
        assert_eq!(devtools.selected().unwrap().name, "increment");
    }

    #[test]
    fn dropped_event_keeps_run_identity_and_selection() {
        let mut devtools = Devtools::new();
        devtools.dispatch(init("r1", json!({}))).unwrap();
        let before = devtools.get_run("r1").unwrap();
        let selected_before = devtools.selected().unwrap();

        // completion with no active top-level action
        devtools
            .dispatch(action("r1", "increment", true, Some(json!({"x": 1}))))
            .unwrap();

        let after = devtools.get_run("r1").unwrap();
        assert!(Arc::ptr_eq(&after, &before));
        assert!(Arc::ptr_eq(&devtools.selected().unwrap(), &selected_before));
    }

    #[test]
    fn events_for_unknown_runs_are_journaled_but_ignored() {
        let mut devtools = Devtools::new();
        devtools
            .dispatch(action("ghost", "increment", false, None))
            .unwrap();
        assert!(devtools.runs().is_empty());
        assert_eq!(devtools.events().len(), 1);
    }

    #[test]
    fn delete_then_reinitialize_starts_fresh() {
        let mut devtools = Devtools::new();
        devtools.dispatch(init("r1", json!({"count": 0}))).unwrap();
        devtools
            .dispatch(action("r1", "increment", false, None))
            .unwrap();
        devtools
            .dispatch(action("r1", "increment", true, Some(json!({"count": 1}))))
            .unwrap();

        assert!(devtools.delete_run("r1"));
        assert!(devtools.get_run("r1").is_none());
        assert!(devtools.selected().is_none());

        devtools.dispatch(init("r1", json!({"count": 5}))).unwrap();
        let run = devtools.get_run("r1").unwrap();
        assert_eq!(run.actions.len(), 1);
        assert_eq!(run.latest_state().unwrap().as_ref(), &json!({"count": 5}));
    }

    #[test]
    fn presentation_fields_are_last_write_wins() {
        let mut devtools = Devtools::new();
        assert!(!devtools.view().pane_shown);

        devtools.show_pane(true);
        devtools.set_pane_display(PaneDisplay::Bottom);
        devtools.set_value_display(ValueDisplay::Raw);
        devtools.toggle_collapse_repeating_actions();

        let view = devtools.view();
        assert!(view.pane_shown);
        assert_eq!(view.pane_display, PaneDisplay::Bottom);
        assert_eq!(view.value_display, ValueDisplay::Raw);
        assert!(view.collapse_repeating_actions);
    }

    #[test]
    fn prior_snapshots_survive_later_events() {
        let mut devtools = Devtools::new();
        devtools.dispatch(init("r1", json!({"count": 0}))).unwrap();
        devtools
            .dispatch(action("r1", "increment", false, None))
            .unwrap();
        let snapshot = devtools.get_run("r1").unwrap();
        let open_action = Arc::clone(&snapshot.actions[1]);

        devtools
            .dispatch(action("r1", "increment", true, Some(json!({"count": 1}))))
            .unwrap();

        // the old snapshot still shows the action as open
        assert!(!snapshot.actions[1].done);
        assert!(!open_action.done);
        // while the current run sees it done
        assert!(devtools.get_run("r1").unwrap().actions[1].done);
    }
}
