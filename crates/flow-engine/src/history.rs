//! Bounded undo/redo history using compressed snapshots
//!
//! Editing history is a stack of whole-graph snapshots rather than a
//! command log: there are no inverse operations to keep correct, any
//! mutation is coverable, and zstd keeps the retained states small.
//! Decoding a snapshot always materializes a fresh value, so the
//! working graph can never alias a stack entry.
//!
//! The manager keeps three slots: the working `present` graph, a bounded
//! `past` stack of labeled steps, and a `future` stack holding redo
//! targets. Every transition persists `present` through the blob store
//! gateway; persistence is best-effort and never interrupts the
//! in-memory state.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::store::{BlobStore, WORKFLOW_KEY};
use crate::types::{now_timestamp, WorkflowGraph};

/// Maximum number of past steps retained before the oldest are evicted
pub const DEFAULT_HISTORY_BOUND: usize = 50;

/// A recorded editing step: a compressed snapshot plus its label
#[derive(Debug)]
pub struct HistoryStep {
    /// zstd-compressed JSON of the graph at this step
    snapshot: Vec<u8>,
    /// Label of the edit that replaced this state
    label: String,
    /// Wall-clock time the step was recorded
    timestamp: String,
}

impl HistoryStep {
    /// Capture a compressed snapshot of the given graph
    fn capture(graph: &WorkflowGraph, label: impl Into<String>) -> Result<Self> {
        let json = serde_json::to_vec(graph)?;
        let snapshot = zstd::encode_all(&json[..], 3)
            .map_err(|e| EngineError::compression(e.to_string()))?;
        Ok(Self {
            snapshot,
            label: label.into(),
            timestamp: now_timestamp(),
        })
    }

    /// Decode the snapshot back into a graph value
    fn restore(&self) -> Result<WorkflowGraph> {
        let json = zstd::decode_all(&self.snapshot[..])
            .map_err(|e| EngineError::compression(e.to_string()))?;
        let graph: WorkflowGraph = serde_json::from_slice(&json)?;
        Ok(graph)
    }

    /// Label of the edit this step belongs to
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Wall-clock time the step was recorded
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Label and timestamp of a recorded step, for history panels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInfo {
    pub label: String,
    pub timestamp: String,
}

/// Undo/redo manager over the committed workflow graph
///
/// Owns the `present`/`past`/`future` slots exclusively. All mutations
/// to the committed graph go through [`commit`](Self::commit); the other
/// transitions move existing snapshots between the slots.
pub struct HistoryManager {
    present: WorkflowGraph,
    past: VecDeque<HistoryStep>,
    future: VecDeque<HistoryStep>,
    bound: usize,
    store: Arc<dyn BlobStore>,
}

impl HistoryManager {
    /// Create a manager backed by the given store
    ///
    /// The committed graph is read once from the store's `workflow` key;
    /// a missing or unparsable blob yields an empty graph.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        let present = match store.load(WORKFLOW_KEY) {
            Some(value) => match serde_json::from_value(value) {
                Ok(graph) => graph,
                Err(e) => {
                    log::warn!("Ignoring unparsable persisted workflow: {}", e);
                    WorkflowGraph::default()
                }
            },
            None => WorkflowGraph::default(),
        };

        Self {
            present,
            past: VecDeque::new(),
            future: VecDeque::new(),
            bound: DEFAULT_HISTORY_BOUND,
            store,
        }
    }

    /// Set the maximum number of retained past steps (at least 1)
    pub fn with_bound(mut self, bound: usize) -> Self {
        self.bound = bound.max(1);
        self
    }

    /// The committed graph
    pub fn present(&self) -> &WorkflowGraph {
        &self.present
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of retained past steps
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of retained future steps
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Labels and timestamps of the past steps, oldest first
    pub fn past_steps(&self) -> Vec<StepInfo> {
        self.past
            .iter()
            .map(|step| StepInfo {
                label: step.label.clone(),
                timestamp: step.timestamp.clone(),
            })
            .collect()
    }

    /// Replace the committed graph with `new_state`
    ///
    /// The outgoing `present` is snapshotted onto `past` under `label`,
    /// the redo stack is cleared (a new edit invalidates all redo
    /// paths), and the oldest past steps are evicted once the bound is
    /// exceeded. Eviction is a fixed-size ring, not an error.
    pub fn commit(&mut self, new_state: WorkflowGraph, label: impl Into<String>) -> Result<()> {
        let step = HistoryStep::capture(&self.present, label)?;
        self.past.push_back(step);
        while self.past.len() > self.bound {
            self.past.pop_front();
        }
        self.future.clear();
        self.present = new_state;
        self.persist();
        Ok(())
    }

    /// Step back to the most recent past state
    ///
    /// Returns the label of the undone edit, or `None` when there is
    /// nothing to undo. The outgoing `present` moves to the front of
    /// `future`, carrying the undone step's label so redo can restate it.
    pub fn undo(&mut self) -> Result<Option<String>> {
        let Some(previous) = self.past.back() else {
            return Ok(None);
        };
        let label = previous.label.clone();
        let restored = previous.restore()?;
        let current = HistoryStep::capture(&self.present, label.clone())?;

        self.past.pop_back();
        self.future.push_front(current);
        self.present = restored;
        self.persist();
        Ok(Some(label))
    }

    /// Step forward to the earliest future state
    ///
    /// Returns the label of the restated edit, or `None` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Result<Option<String>> {
        let Some(next) = self.future.front() else {
            return Ok(None);
        };
        let label = next.label.clone();
        let restored = next.restore()?;
        let current = HistoryStep::capture(&self.present, label.clone())?;

        self.future.pop_front();
        self.past.push_back(current);
        self.present = restored;
        self.persist();
        Ok(Some(label))
    }

    /// Jump directly to `past[index]`, rewriting the timeline
    ///
    /// The past is truncated to the steps before `index` and the redo
    /// stack is discarded entirely. Returns the label of the step jumped
    /// to, or `None` when the index is out of range.
    pub fn jump_to_history(&mut self, index: usize) -> Result<Option<String>> {
        let Some(target) = self.past.get(index) else {
            return Ok(None);
        };
        let label = target.label.clone();
        let restored = target.restore()?;

        self.past.truncate(index);
        self.future.clear();
        self.present = restored;
        self.persist();
        Ok(Some(label))
    }

    /// Install `state` directly, discarding all history
    ///
    /// Not an undoable edit: both stacks are reset and nothing is pushed.
    pub fn load(&mut self, state: WorkflowGraph) {
        self.past.clear();
        self.future.clear();
        self.present = state;
        self.persist();
    }

    /// Reset to an empty graph, discarding all history
    pub fn clear(&mut self) {
        self.load(WorkflowGraph::default());
    }

    /// Write `present` through the blob store gateway, best-effort
    fn persist(&self) {
        match serde_json::to_value(&self.present) {
            Ok(value) => self.store.save(WORKFLOW_KEY, &value),
            Err(e) => log::warn!("Failed to serialize workflow for persistence: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::store::MemoryBlobStore;

    fn make_graph(id: &str) -> WorkflowGraph {
        WorkflowBuilder::new().add_node(id, "manual", (0.0, 0.0)).build()
    }

    fn make_manager() -> HistoryManager {
        HistoryManager::new(Arc::new(MemoryBlobStore::new()))
    }

    #[test]
    fn test_commit_and_undo() {
        let mut history = make_manager();

        history.commit(make_graph("first"), "Add first").unwrap();
        history.commit(make_graph("second"), "Add second").unwrap();
        assert_eq!(history.present().nodes[0].id, "second");
        assert_eq!(history.past_len(), 2);

        let label = history.undo().unwrap();
        assert_eq!(label.as_deref(), Some("Add second"));
        assert_eq!(history.present().nodes[0].id, "first");

        let label = history.undo().unwrap();
        assert_eq!(label.as_deref(), Some("Add first"));
        assert!(history.present().is_empty());

        // Nothing left to undo
        assert_eq!(history.undo().unwrap(), None);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = make_manager();

        history.commit(make_graph("first"), "Add first").unwrap();
        history.commit(make_graph("second"), "Add second").unwrap();
        let before = history.present().clone();

        history.undo().unwrap();
        let label = history.redo().unwrap();
        assert_eq!(label.as_deref(), Some("Add second"));
        assert_eq!(history.present(), &before);

        // Nothing left to redo
        assert_eq!(history.redo().unwrap(), None);
    }

    #[test]
    fn test_commit_clears_future() {
        let mut history = make_manager();

        history.commit(make_graph("first"), "Add first").unwrap();
        history.commit(make_graph("second"), "Add second").unwrap();
        history.undo().unwrap();
        assert!(history.can_redo());

        history.commit(make_graph("third"), "Add third").unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.present().nodes[0].id, "third");
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut history = make_manager().with_bound(3);

        for i in 0..6 {
            history
                .commit(make_graph(&format!("graph_{i}")), format!("Edit {i}"))
                .unwrap();
        }

        assert_eq!(history.past_len(), 3);
        // The three most recent steps survive, in order
        let labels: Vec<_> = history.past_steps().into_iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Edit 3", "Edit 4", "Edit 5"]);

        // Undo bottoms out at the bound
        assert!(history.undo().unwrap().is_some());
        assert!(history.undo().unwrap().is_some());
        assert!(history.undo().unwrap().is_some());
        assert_eq!(history.undo().unwrap(), None);
        assert_eq!(history.present().nodes[0].id, "graph_2");
    }

    #[test]
    fn test_jump_truncates_past_and_clears_future() {
        let mut history = make_manager();

        for i in 0..5 {
            history
                .commit(make_graph(&format!("graph_{i}")), format!("Edit {i}"))
                .unwrap();
        }
        history.undo().unwrap();
        assert!(history.can_redo());

        // past now holds the states before edits 0..4
        let label = history.jump_to_history(1).unwrap();
        assert_eq!(label.as_deref(), Some("Edit 1"));
        assert_eq!(history.past_len(), 1);
        assert!(!history.can_redo());
        assert_eq!(history.present().nodes[0].id, "graph_0");
    }

    #[test]
    fn test_jump_out_of_range_is_noop() {
        let mut history = make_manager();
        history.commit(make_graph("first"), "Add first").unwrap();

        assert_eq!(history.jump_to_history(5).unwrap(), None);
        assert_eq!(history.past_len(), 1);
        assert_eq!(history.present().nodes[0].id, "first");
    }

    #[test]
    fn test_load_resets_history() {
        let mut history = make_manager();
        history.commit(make_graph("first"), "Add first").unwrap();
        history.commit(make_graph("second"), "Add second").unwrap();
        history.undo().unwrap();

        history.load(make_graph("loaded"));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.present().nodes[0].id, "loaded");
    }

    #[test]
    fn test_persists_on_every_transition() {
        let store = Arc::new(MemoryBlobStore::new());
        let mut history = HistoryManager::new(store.clone());

        history.commit(make_graph("first"), "Add first").unwrap();
        let persisted: WorkflowGraph =
            serde_json::from_value(store.load(WORKFLOW_KEY).unwrap()).unwrap();
        assert_eq!(persisted.nodes[0].id, "first");

        history.undo().unwrap();
        let persisted: WorkflowGraph =
            serde_json::from_value(store.load(WORKFLOW_KEY).unwrap()).unwrap();
        assert!(persisted.is_empty());
    }

    #[test]
    fn test_new_reads_persisted_workflow() {
        let store = Arc::new(MemoryBlobStore::new());
        store.save(
            WORKFLOW_KEY,
            &serde_json::to_value(make_graph("restored")).unwrap(),
        );

        let history = HistoryManager::new(store);
        assert_eq!(history.present().nodes[0].id, "restored");
    }

    #[test]
    fn test_new_tolerates_unparsable_blob() {
        let store = Arc::new(MemoryBlobStore::new());
        store.save(WORKFLOW_KEY, &serde_json::json!({"nodes": "nonsense"}));

        let history = HistoryManager::new(store);
        assert!(history.present().is_empty());
    }
}
