//! The workflow application service
//!
//! Commands mutate the graph by building a new snapshot and committing
//! it; the history manager owns the committed state and the simulator
//! owns the transient run state. In a multi-threaded host the service
//! is the single synchronization point for history mutations.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use flow_engine::history::{HistoryManager, StepInfo};
use flow_engine::simulation::{RunStatus, Simulator};
use flow_engine::store::{BlobStore, VIEWPORT_KEY};
use flow_engine::types::{LogEntry, LogStatus, NodeId, Viewport, WorkflowGraph, WorkflowNode};
use flow_engine::validation;
use flow_engine::Result;

/// Canvas offset applied to duplicated nodes
const DUPLICATE_OFFSET: f64 = 40.0;

/// Owned application state for one workflow document
///
/// Construct once per document and share by reference; commands take
/// `&self` and synchronize internally.
pub struct WorkflowService {
    history: Mutex<HistoryManager>,
    simulator: Arc<Simulator>,
    store: Arc<dyn BlobStore>,
    selected_node: Mutex<Option<NodeId>>,
    viewport: Mutex<Option<Viewport>>,
}

impl WorkflowService {
    /// Create a service backed by the given store, with a default simulator
    ///
    /// The committed graph and viewport are read once from the store;
    /// missing or unparsable blobs yield empty defaults.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self::with_simulator(store, Simulator::new())
    }

    /// Create a service with a preconfigured simulator
    ///
    /// Hosts use this to set the node delay, branch oracle, or event
    /// sink before the service takes ownership.
    pub fn with_simulator(store: Arc<dyn BlobStore>, simulator: Simulator) -> Self {
        let history = HistoryManager::new(store.clone());
        let viewport = store
            .load(VIEWPORT_KEY)
            .and_then(|value| match serde_json::from_value(value) {
                Ok(viewport) => Some(viewport),
                Err(e) => {
                    log::warn!("Ignoring unparsable persisted viewport: {}", e);
                    None
                }
            });

        Self {
            history: Mutex::new(history),
            simulator: Arc::new(simulator),
            store,
            selected_node: Mutex::new(None),
            viewport: Mutex::new(viewport),
        }
    }

    // =========================================================================
    // History commands
    // =========================================================================

    /// Commit a new graph snapshot under the given edit label
    pub fn commit(&self, state: WorkflowGraph, label: impl Into<String>) -> Result<()> {
        self.history.lock().commit(state, label)
    }

    /// Undo the most recent edit
    ///
    /// Returns whether anything was undone; a successful undo appends
    /// an `Undo: <label>` entry to the activity log.
    pub fn undo(&self) -> Result<bool> {
        match self.history.lock().undo()? {
            Some(label) => {
                self.simulator.push_log(LogEntry::new(
                    LogEntry::SYSTEM,
                    LogStatus::Success,
                    format!("Undo: {label}"),
                ));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Redo the most recently undone edit
    pub fn redo(&self) -> Result<bool> {
        match self.history.lock().redo()? {
            Some(label) => {
                self.simulator.push_log(LogEntry::new(
                    LogEntry::SYSTEM,
                    LogStatus::Success,
                    format!("Redo: {label}"),
                ));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Jump directly to a past step, rewriting the timeline
    pub fn jump_to_history(&self, index: usize) -> Result<bool> {
        match self.history.lock().jump_to_history(index)? {
            Some(label) => {
                self.simulator.push_log(LogEntry::new(
                    LogEntry::SYSTEM,
                    LogStatus::Success,
                    format!("Jumped to: {label}"),
                ));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Install a workflow directly, discarding all history
    pub fn load_workflow(&self, state: WorkflowGraph) {
        self.history.lock().load(state);
        *self.selected_node.lock() = None;
    }

    /// Reset to an empty workflow, discarding all history and selections
    pub fn clear_workflow(&self) {
        self.history.lock().clear();
        *self.selected_node.lock() = None;
        self.simulator.set_selected_start_node(None);
    }

    // =========================================================================
    // Node and edge commands
    // =========================================================================

    /// Duplicate a node, offset on the canvas, under a fresh id
    ///
    /// Returns `false` without committing when the node doesn't exist.
    pub fn duplicate_node(&self, node_id: &str) -> Result<bool> {
        let mut history = self.history.lock();
        let Some(node) = history.present().find_node(node_id).cloned() else {
            return Ok(false);
        };

        let mut copy = node;
        copy.id = Uuid::new_v4().to_string();
        copy.selected = false;
        copy.position.x += DUPLICATE_OFFSET;
        copy.position.y += DUPLICATE_OFFSET;
        let label = format!("Duplicate {}", copy.node_type);

        let mut next = history.present().clone();
        next.nodes.push(copy);
        history.commit(next, label)?;
        Ok(true)
    }

    /// Delete a node and every edge referencing it, in one commit
    ///
    /// Clears either selection pointer if it referenced the node.
    pub fn delete_node(&self, node_id: &str) -> Result<()> {
        {
            let mut history = self.history.lock();
            let present = history.present();
            let node_type = present
                .find_node(node_id)
                .map(|n| n.node_type.clone())
                .unwrap_or_else(|| "Node".to_string());
            let next = WorkflowGraph {
                nodes: present
                    .nodes
                    .iter()
                    .filter(|n| n.id != node_id)
                    .cloned()
                    .collect(),
                edges: present
                    .edges
                    .iter()
                    .filter(|e| e.source != node_id && e.target != node_id)
                    .cloned()
                    .collect(),
            };
            history.commit(next, format!("Delete {node_type}"))?;
        }

        {
            let mut selected = self.selected_node.lock();
            if selected.as_deref() == Some(node_id) {
                *selected = None;
            }
        }
        self.simulator.clear_selected_start_if(node_id);
        Ok(())
    }

    /// Delete an edge by id, in one commit
    pub fn delete_edge(&self, edge_id: &str) -> Result<()> {
        let mut history = self.history.lock();
        let present = history.present();
        let next = WorkflowGraph {
            nodes: present.nodes.clone(),
            edges: present
                .edges
                .iter()
                .filter(|e| e.id != edge_id)
                .cloned()
                .collect(),
        };
        history.commit(next, "Delete Edge")
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Node selected in the editor, if any
    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected_node.lock().clone()
    }

    /// Select (or deselect) a node in the editor
    pub fn set_selected_node(&self, node_id: Option<NodeId>) {
        *self.selected_node.lock() = node_id;
    }

    /// The user-pinned simulation entry point, if any
    pub fn selected_start_node(&self) -> Option<NodeId> {
        self.simulator.selected_start_node()
    }

    /// Pin (or unpin) the simulation entry point
    pub fn set_selected_start_node(&self, node_id: Option<NodeId>) {
        self.simulator.set_selected_start_node(node_id);
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Run one simulation over the committed graph
    ///
    /// Returns `None` when a run is already in progress.
    pub async fn run_simulation(&self) -> Option<RunStatus> {
        let graph = self.history.lock().present().clone();
        self.simulator.run(graph).await
    }

    /// Request cancellation of the run in progress
    pub fn cancel_simulation(&self) {
        self.simulator.cancel();
    }

    /// Whether a simulation run is in progress
    pub fn is_running(&self) -> bool {
        self.simulator.is_running()
    }

    /// Node currently "executing", if a run is in progress
    pub fn active_node(&self) -> Option<NodeId> {
        self.simulator.active_node()
    }

    /// Append an entry to the activity log
    pub fn add_log(
        &self,
        node_id: impl Into<String>,
        status: LogStatus,
        message: impl Into<String>,
    ) {
        self.simulator
            .push_log(LogEntry::new(node_id, status, message));
    }

    /// Snapshot of the activity log
    pub fn logs(&self) -> Vec<LogEntry> {
        self.simulator.logs()
    }

    // =========================================================================
    // State queries
    // =========================================================================

    /// Copy of the committed graph
    pub fn present(&self) -> WorkflowGraph {
        self.history.lock().present().clone()
    }

    /// Candidate simulation entry points, in node order
    pub fn start_nodes(&self) -> Vec<WorkflowNode> {
        let history = self.history.lock();
        let present = history.present();
        validation::start_nodes(&present.nodes, &present.edges)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Advisory warnings about the committed graph's structure
    pub fn validation_warnings(&self) -> Vec<String> {
        let history = self.history.lock();
        validation::validation_warnings(history.present())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Whether an undo step is available
    pub fn can_undo(&self) -> bool {
        self.history.lock().can_undo()
    }

    /// Whether a redo step is available
    pub fn can_redo(&self) -> bool {
        self.history.lock().can_redo()
    }

    /// Labels and timestamps of the past steps, oldest first
    pub fn past_steps(&self) -> Vec<StepInfo> {
        self.history.lock().past_steps()
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    /// Persist the canvas viewport, independent of graph history
    pub fn save_viewport(&self, viewport: Viewport) {
        *self.viewport.lock() = Some(viewport);
        match serde_json::to_value(viewport) {
            Ok(value) => self.store.save(VIEWPORT_KEY, &value),
            Err(e) => log::warn!("Failed to serialize viewport for persistence: {}", e),
        }
    }

    /// The saved canvas viewport, if any
    pub fn viewport(&self) -> Option<Viewport> {
        *self.viewport.lock()
    }
}
