//! Simulated execution of workflow graphs
//!
//! The simulator walks a committed graph snapshot from its entry point,
//! one node at a time, producing an ordered activity log. Execution is
//! simulated: each node "runs" for a fixed delay, condition nodes draw
//! a branch outcome, and everything else follows its first outgoing
//! edge.
//!
//! The walk itself lives in [`SimulationRun`], a synchronous step
//! function that advances one node per call and can be driven without a
//! runtime. [`Simulator`] owns the run lifecycle: entry-point
//! resolution, the suspension between steps, cooperative cancellation,
//! and the shared cursor host UIs observe.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::events::{EventSink, NullEventSink, SimulationEvent};
use crate::types::{
    LogEntry, LogStatus, NodeId, WorkflowEdge, WorkflowGraph, WorkflowNode, BRANCH_FALSE,
    BRANCH_TRUE,
};
use crate::validation;

/// Probability that a condition draw selects the "true" branch
pub const DEFAULT_PASS_RATE: f64 = 0.7;

/// Simulated per-node execution latency
pub const DEFAULT_NODE_DELAY: Duration = Duration::from_millis(1000);

/// Step budget guarding against unbounded runs on cyclic graphs
pub const DEFAULT_STEP_BUDGET: usize = 1000;

/// Source of condition-branch outcomes
///
/// Injectable so runs can be made deterministic in tests; the
/// production oracle draws from a thread-local RNG.
pub trait BranchOracle: Send {
    /// Draw one outcome; `true` selects the "true" branch
    fn draw(&mut self) -> bool;
}

/// Production oracle: passes with a fixed probability
pub struct PassRateOracle {
    pass_rate: f64,
}

impl PassRateOracle {
    pub fn new(pass_rate: f64) -> Self {
        Self { pass_rate }
    }
}

impl Default for PassRateOracle {
    fn default() -> Self {
        Self::new(DEFAULT_PASS_RATE)
    }
}

impl BranchOracle for PassRateOracle {
    fn draw(&mut self) -> bool {
        rand::rng().random::<f64>() < self.pass_rate
    }
}

/// Scripted oracle for tests: replays a fixed outcome sequence
///
/// Draws beyond the scripted sequence return `true`.
pub struct ScriptedOracle {
    outcomes: VecDeque<bool>,
}

impl ScriptedOracle {
    pub fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }
}

impl BranchOracle for ScriptedOracle {
    fn draw(&mut self) -> bool {
        self.outcomes.pop_front().unwrap_or(true)
    }
}

/// Terminal state of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    /// The walk reached a node with no outgoing edges
    Finished,
    /// The walk could not start or could not proceed
    Errored,
    /// The run was cancelled between steps
    Cancelled,
}

/// Result of advancing the walk by one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The node executed and selected a successor; suspend, then step again
    Continue,
    /// The node had no outgoing edges; the run is complete
    Finished,
    /// The walk cannot proceed (no matching branch, missing target, budget)
    Failed,
}

/// One in-progress walk over a graph snapshot
///
/// Pure and synchronous: each [`step`](Self::step) call executes the
/// current node, appends its log entries, and selects the successor.
/// The caller decides what happens between steps (the simulator sleeps
/// for the simulated latency; tests step straight through).
pub struct SimulationRun {
    graph: WorkflowGraph,
    current: Option<NodeId>,
    oracle: Box<dyn BranchOracle>,
    steps_taken: usize,
    step_budget: usize,
    pending: Vec<LogEntry>,
}

impl SimulationRun {
    /// Start a walk at the given node
    pub fn new(graph: WorkflowGraph, start: NodeId, oracle: Box<dyn BranchOracle>) -> Self {
        Self {
            graph,
            current: Some(start),
            oracle,
            steps_taken: 0,
            step_budget: DEFAULT_STEP_BUDGET,
            pending: Vec::new(),
        }
    }

    /// Set the maximum number of nodes this run may execute
    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = budget;
        self
    }

    /// Node the walk will execute on the next `step` call
    pub fn current_node(&self) -> Option<&NodeId> {
        self.current.as_ref()
    }

    /// Number of nodes executed so far
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Drain the log entries produced since the last call
    pub fn take_logs(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.pending)
    }

    /// Execute the current node and select its successor
    pub fn step(&mut self) -> StepOutcome {
        let Some(node_id) = self.current.clone() else {
            return StepOutcome::Finished;
        };

        if self.steps_taken >= self.step_budget {
            self.log(
                LogEntry::SYSTEM,
                LogStatus::Error,
                format!("Execution limit reached ({} nodes).", self.step_budget),
            );
            self.current = None;
            return StepOutcome::Failed;
        }
        self.steps_taken += 1;

        let Some(node) = self.graph.find_node(&node_id).cloned() else {
            self.log(
                LogEntry::SYSTEM,
                LogStatus::Error,
                format!("Node '{}' not found.", node_id),
            );
            self.current = None;
            return StepOutcome::Failed;
        };

        self.log(
            &node.id,
            LogStatus::Success,
            format!("Executing {}...", node.label()),
        );

        let outgoing: Vec<WorkflowEdge> = self.graph.outgoing_edges(&node.id).cloned().collect();
        if outgoing.is_empty() {
            self.log(&node.id, LogStatus::Success, "Workflow Finished.");
            self.current = None;
            return StepOutcome::Finished;
        }

        let next_edge = if node.is_condition() {
            self.select_branch(&node, &outgoing)
        } else {
            Some(outgoing[0].clone())
        };

        let Some(edge) = next_edge else {
            self.log(&node.id, LogStatus::Error, "No valid path found.");
            self.current = None;
            return StepOutcome::Failed;
        };

        if self.graph.contains_node(&edge.target) {
            self.current = Some(edge.target.clone());
            StepOutcome::Continue
        } else {
            // An edge can outlive its target node; treat that as a
            // broken path rather than a silent stop.
            self.log(
                &node.id,
                LogStatus::Error,
                format!("Edge '{}' points to missing node '{}'.", edge.id, edge.target),
            );
            self.current = None;
            StepOutcome::Failed
        }
    }

    /// Draw a branch outcome and select the matching outgoing edge
    ///
    /// Every non-selected outgoing edge is logged as skipped.
    fn select_branch(
        &mut self,
        node: &WorkflowNode,
        outgoing: &[WorkflowEdge],
    ) -> Option<WorkflowEdge> {
        let branch = if self.oracle.draw() {
            BRANCH_TRUE
        } else {
            BRANCH_FALSE
        };
        self.log(
            &node.id,
            LogStatus::Success,
            format!("Condition evaluated to: {}", branch.to_uppercase()),
        );

        let chosen = outgoing
            .iter()
            .find(|e| e.source_handle.as_deref() == Some(branch))
            .cloned();

        for edge in outgoing {
            let selected = chosen.as_ref().is_some_and(|c| c.id == edge.id);
            if !selected {
                self.log(
                    &edge.target,
                    LogStatus::Skipped,
                    format!("Branch {} skipped.", edge.label.as_deref().unwrap_or("")),
                );
            }
        }
        chosen
    }

    fn log(&mut self, node_id: impl Into<String>, status: LogStatus, message: impl Into<String>) {
        self.pending.push(LogEntry::new(node_id, status, message));
    }
}

/// The simulation engine
///
/// Owns the run lifecycle and the transient cursor: the active node,
/// the running flag (which doubles as the cooperative cancellation
/// signal), the pinned start node, and the activity log. At most one
/// run executes at a time; a `run` call while one is in progress is a
/// no-op.
pub struct Simulator {
    node_delay: Duration,
    step_budget: usize,
    oracle_factory: OracleFactory,
    sink: Arc<dyn EventSink>,
    running: AtomicBool,
    active_node: Mutex<Option<NodeId>>,
    selected_start: Mutex<Option<NodeId>>,
    logs: Mutex<Vec<LogEntry>>,
}

type OracleFactory = Arc<dyn Fn() -> Box<dyn BranchOracle> + Send + Sync>;

impl Simulator {
    /// Create a simulator with production defaults
    pub fn new() -> Self {
        Self {
            node_delay: DEFAULT_NODE_DELAY,
            step_budget: DEFAULT_STEP_BUDGET,
            oracle_factory: Arc::new(|| Box::new(PassRateOracle::default())),
            sink: Arc::new(NullEventSink),
            running: AtomicBool::new(false),
            active_node: Mutex::new(None),
            selected_start: Mutex::new(None),
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Set the simulated per-node latency
    pub fn with_node_delay(mut self, delay: Duration) -> Self {
        self.node_delay = delay;
        self
    }

    /// Set the per-run step budget
    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = budget;
        self
    }

    /// Replace the branch oracle used by each run
    pub fn with_oracle_factory(
        mut self,
        factory: impl Fn() -> Box<dyn BranchOracle> + Send + Sync + 'static,
    ) -> Self {
        self.oracle_factory = Arc::new(factory);
        self
    }

    /// Stream run progress to the given sink
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Whether a run is currently in progress
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Node currently "executing", if a run is in progress
    pub fn active_node(&self) -> Option<NodeId> {
        self.active_node.lock().clone()
    }

    /// Snapshot of the activity log
    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().clone()
    }

    /// Append an entry to the activity log
    pub fn push_log(&self, entry: LogEntry) {
        self.logs.lock().push(entry.clone());
        self.emit(SimulationEvent::LogAppended { entry });
    }

    /// The user-pinned entry point, if any
    pub fn selected_start_node(&self) -> Option<NodeId> {
        self.selected_start.lock().clone()
    }

    /// Pin (or unpin) the entry point for subsequent runs
    pub fn set_selected_start_node(&self, node_id: Option<NodeId>) {
        *self.selected_start.lock() = node_id;
    }

    /// Drop the pinned entry point if it references the given node
    pub fn clear_selected_start_if(&self, node_id: &str) {
        let mut selected = self.selected_start.lock();
        if selected.as_deref() == Some(node_id) {
            *selected = None;
        }
    }

    /// Request cancellation of the run in progress
    ///
    /// Cooperative: the walk observes the flag at the next step
    /// boundary, after the current suspension completes.
    pub fn cancel(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Run one simulation over the given graph snapshot
    ///
    /// Clears the activity log, resolves the entry point, and walks the
    /// graph until a terminal state. Returns `None` when a run is
    /// already in progress (the call is a no-op). On return the cursor
    /// is cleared and the running flag is false.
    pub async fn run(&self, graph: WorkflowGraph) -> Option<RunStatus> {
        if self.running.swap(true, Ordering::SeqCst) {
            return None;
        }
        self.logs.lock().clear();

        let status = self.run_inner(graph).await;

        *self.active_node.lock() = None;
        self.running.store(false, Ordering::SeqCst);
        self.emit(SimulationEvent::RunCompleted { status });
        log::debug!("Simulation run completed: {:?}", status);
        Some(status)
    }

    async fn run_inner(&self, graph: WorkflowGraph) -> RunStatus {
        let Some(start_id) = self.resolve_start(&graph) else {
            self.push_log(LogEntry::new(
                LogEntry::SYSTEM,
                LogStatus::Error,
                "No valid start node found. Create a manual or webhook trigger node without incoming edges.",
            ));
            return RunStatus::Errored;
        };

        log::debug!("Simulation starting from node '{}'", start_id);
        self.emit(SimulationEvent::RunStarted {
            start_node_id: start_id.clone(),
        });

        let mut run = SimulationRun::new(graph, start_id, (self.oracle_factory)())
            .with_step_budget(self.step_budget);

        loop {
            if !self.running.load(Ordering::SeqCst) {
                return RunStatus::Cancelled;
            }
            let Some(node_id) = run.current_node().cloned() else {
                return RunStatus::Finished;
            };

            *self.active_node.lock() = Some(node_id.clone());
            self.emit(SimulationEvent::NodeEntered { node_id });

            let outcome = run.step();
            for entry in run.take_logs() {
                self.push_log(entry);
            }

            match outcome {
                StepOutcome::Continue => tokio::time::sleep(self.node_delay).await,
                StepOutcome::Finished => return RunStatus::Finished,
                StepOutcome::Failed => return RunStatus::Errored,
            }
        }
    }

    /// Resolve the entry point for a run
    ///
    /// A pinned node wins if it still exists; a stale pin is cleared
    /// and resolution falls through to the first start-node candidate.
    /// With several candidates the first is used and an advisory entry
    /// names it.
    fn resolve_start(&self, graph: &WorkflowGraph) -> Option<NodeId> {
        {
            let mut selected = self.selected_start.lock();
            if let Some(id) = selected.clone() {
                if graph.contains_node(&id) {
                    return Some(id);
                }
                *selected = None;
            }
        }

        let starts = validation::start_nodes(&graph.nodes, &graph.edges);
        let first = starts.first()?;
        if starts.len() > 1 {
            self.push_log(LogEntry::new(
                LogEntry::SYSTEM,
                LogStatus::Error,
                format!(
                    "Multiple start nodes detected. Executing: \"{}\". Other start nodes will be ignored.",
                    first.label()
                ),
            ));
        }
        Some(first.id.clone())
    }

    fn emit(&self, event: SimulationEvent) {
        self.sink.send(event);
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::events::VecEventSink;

    fn linear_graph() -> WorkflowGraph {
        WorkflowBuilder::new()
            .add_node("a", "manual", (0.0, 0.0))
            .with_label("A")
            .add_node("b", "http", (200.0, 0.0))
            .with_label("B")
            .add_node("c", "http", (400.0, 0.0))
            .with_label("C")
            .add_edge("a", "b")
            .add_edge("b", "c")
            .build()
    }

    fn condition_graph() -> WorkflowGraph {
        WorkflowBuilder::new()
            .add_node("m", "manual", (0.0, 0.0))
            .add_node("x", "condition", (200.0, 0.0))
            .add_node("t", "email", (400.0, -50.0))
            .add_node("f", "sms", (400.0, 50.0))
            .add_edge("m", "x")
            .add_branch_edge("x", "t", "true")
            .with_edge_label("yes")
            .add_branch_edge("x", "f", "false")
            .with_edge_label("no")
            .build()
    }

    fn instant_simulator() -> Simulator {
        Simulator::new().with_node_delay(Duration::ZERO)
    }

    fn messages(sim: &Simulator) -> Vec<String> {
        sim.logs().into_iter().map(|e| e.message).collect()
    }

    #[tokio::test]
    async fn test_linear_run_visits_nodes_in_order() {
        let sim = instant_simulator();
        let status = sim.run(linear_graph()).await;

        assert_eq!(status, Some(RunStatus::Finished));
        assert_eq!(
            messages(&sim),
            vec![
                "Executing A...",
                "Executing B...",
                "Executing C...",
                "Workflow Finished.",
            ]
        );
        assert_eq!(sim.active_node(), None);
        assert!(!sim.is_running());
    }

    #[tokio::test]
    async fn test_run_clears_previous_log() {
        let sim = instant_simulator();
        sim.run(linear_graph()).await;
        assert_eq!(sim.logs().len(), 4);

        sim.run(linear_graph()).await;
        assert_eq!(sim.logs().len(), 4);
    }

    #[tokio::test]
    async fn test_no_start_node_errors_without_walking() {
        let graph = WorkflowBuilder::new()
            .add_node("h", "http", (0.0, 0.0))
            .build();

        let sim = instant_simulator();
        let status = sim.run(graph).await;

        assert_eq!(status, Some(RunStatus::Errored));
        let logs = sim.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Error);
        assert!(logs[0].message.contains("No valid start node"));
        assert_eq!(sim.active_node(), None);
    }

    #[tokio::test]
    async fn test_multiple_starts_picks_first_and_warns() {
        let graph = WorkflowBuilder::new()
            .add_node("m1", "manual", (0.0, 0.0))
            .with_label("First trigger")
            .add_node("m2", "webhook", (0.0, 100.0))
            .build();

        let sim = instant_simulator();
        let status = sim.run(graph).await;

        assert_eq!(status, Some(RunStatus::Finished));
        let logs = sim.logs();
        assert_eq!(logs[0].status, LogStatus::Error);
        assert!(logs[0].message.contains("Multiple start nodes"));
        assert!(logs[0].message.contains("First trigger"));
        assert_eq!(logs[1].message, "Executing First trigger...");
    }

    #[tokio::test]
    async fn test_pinned_start_overrides_resolution() {
        let sim = instant_simulator();
        sim.set_selected_start_node(Some("b".to_string()));

        let status = sim.run(linear_graph()).await;
        assert_eq!(status, Some(RunStatus::Finished));
        assert_eq!(
            messages(&sim),
            vec!["Executing B...", "Executing C...", "Workflow Finished."]
        );
        // The pin survives for the next run
        assert_eq!(sim.selected_start_node().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_stale_pin_is_cleared_and_falls_back() {
        let sim = instant_simulator();
        sim.set_selected_start_node(Some("ghost".to_string()));

        let status = sim.run(linear_graph()).await;
        assert_eq!(status, Some(RunStatus::Finished));
        assert_eq!(sim.selected_start_node(), None);
        assert_eq!(sim.logs()[0].message, "Executing A...");
    }

    #[tokio::test]
    async fn test_condition_follows_scripted_branch() {
        let sim = instant_simulator()
            .with_oracle_factory(|| Box::new(ScriptedOracle::new([false])));

        let status = sim.run(condition_graph()).await;
        assert_eq!(status, Some(RunStatus::Finished));

        let logs = sim.logs();
        let msgs: Vec<_> = logs.iter().map(|e| e.message.as_str()).collect();
        assert!(msgs.contains(&"Condition evaluated to: FALSE"));
        assert!(msgs.contains(&"Executing sms..."));
        assert!(!msgs.contains(&"Executing email..."));

        let skipped: Vec<_> = logs
            .iter()
            .filter(|e| e.status == LogStatus::Skipped)
            .collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].node_id, "t");
        assert_eq!(skipped[0].message, "Branch yes skipped.");
    }

    #[tokio::test]
    async fn test_condition_without_matching_branch_errors() {
        let graph = WorkflowBuilder::new()
            .add_node("m", "manual", (0.0, 0.0))
            .add_node("x", "condition", (200.0, 0.0))
            .add_node("t", "email", (400.0, 0.0))
            .add_edge("m", "x")
            .add_edge("x", "t")
            .build();

        let sim = instant_simulator()
            .with_oracle_factory(|| Box::new(ScriptedOracle::new([true])));
        let status = sim.run(graph).await;

        assert_eq!(status, Some(RunStatus::Errored));
        let logs = sim.logs();
        let last = logs.last().unwrap();
        assert_eq!(last.status, LogStatus::Error);
        assert_eq!(last.message, "No valid path found.");
        // The unmatched edge is still reported as skipped
        assert!(logs.iter().any(|e| e.status == LogStatus::Skipped));
    }

    #[tokio::test]
    async fn test_both_branches_reachable_under_random_oracle() {
        let sim = instant_simulator();
        let mut saw_true = false;
        let mut saw_false = false;

        for _ in 0..200 {
            sim.run(condition_graph()).await;
            let msgs = messages(&sim);
            saw_true |= msgs.iter().any(|m| m == "Condition evaluated to: TRUE");
            saw_false |= msgs.iter().any(|m| m == "Condition evaluated to: FALSE");
            if saw_true && saw_false {
                break;
            }
        }

        assert!(saw_true);
        assert!(saw_false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_concurrent_run() {
        let sim = Arc::new(Simulator::new());
        let handle = {
            let sim = sim.clone();
            tokio::spawn(async move { sim.run(linear_graph()).await })
        };

        // Let the spawned run reach its first suspension
        while !sim.is_running() {
            tokio::task::yield_now().await;
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(sim.run(linear_graph()).await, None);

        sim.cancel();
        let status = handle.await.unwrap();
        assert_eq!(status, Some(RunStatus::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_before_next_node() {
        let sim = Arc::new(Simulator::new());
        let handle = {
            let sim = sim.clone();
            tokio::spawn(async move { sim.run(linear_graph()).await })
        };

        // Wait until the first node has executed and the run is suspended
        while !messages(&sim).iter().any(|m| m == "Executing A...") {
            tokio::task::yield_now().await;
        }
        sim.cancel();

        let status = handle.await.unwrap();
        assert_eq!(status, Some(RunStatus::Cancelled));

        let msgs = messages(&sim);
        assert!(msgs.contains(&"Executing A...".to_string()));
        assert!(!msgs.contains(&"Executing B...".to_string()));
        assert_eq!(sim.active_node(), None);
        assert!(!sim.is_running());
    }

    #[tokio::test]
    async fn test_events_stream_run_progress() {
        let sink = Arc::new(VecEventSink::new());
        let sim = instant_simulator().with_event_sink(sink.clone());

        sim.run(linear_graph()).await;

        let events = sink.events();
        assert!(matches!(
            events.first(),
            Some(SimulationEvent::RunStarted { start_node_id }) if start_node_id == "a"
        ));
        let entered: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SimulationEvent::NodeEntered { node_id } => Some(node_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(entered, vec!["a", "b", "c"]);
        assert!(matches!(
            events.last(),
            Some(SimulationEvent::RunCompleted {
                status: RunStatus::Finished
            })
        ));
    }

    #[test]
    fn test_step_budget_stops_cyclic_graph() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "manual", (0.0, 0.0))
            .add_node("b", "http", (200.0, 0.0))
            .add_edge("a", "b")
            .add_edge("b", "a")
            .build();

        let mut run = SimulationRun::new(graph, "a".to_string(), Box::new(ScriptedOracle::new([])))
            .with_step_budget(3);

        let mut guard = 0;
        loop {
            guard += 1;
            assert!(guard < 100, "run did not terminate");
            match run.step() {
                StepOutcome::Continue => {}
                StepOutcome::Failed => break,
                StepOutcome::Finished => panic!("expected the budget to fail the run"),
            }
        }

        assert_eq!(run.steps_taken(), 3);
        let logs = run.take_logs();
        let last = logs.last().unwrap();
        assert_eq!(last.status, LogStatus::Error);
        assert_eq!(last.message, "Execution limit reached (3 nodes).");
    }

    #[test]
    fn test_dangling_edge_target_fails_with_explicit_error() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "manual", (0.0, 0.0))
            .add_edge("a", "ghost")
            .build();

        let mut run =
            SimulationRun::new(graph, "a".to_string(), Box::new(ScriptedOracle::new([])));

        assert_eq!(run.step(), StepOutcome::Failed);
        assert_eq!(run.current_node(), None);

        let logs = run.take_logs();
        let last = logs.last().unwrap();
        assert_eq!(last.status, LogStatus::Error);
        assert_eq!(last.message, "Edge 'edge-1' points to missing node 'ghost'.");
    }

    #[test]
    fn test_first_edge_wins_for_plain_nodes() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "manual", (0.0, 0.0))
            .add_node("b", "http", (200.0, -50.0))
            .add_node("c", "http", (200.0, 50.0))
            .add_edge("a", "b")
            .add_edge("a", "c")
            .build();

        let mut run =
            SimulationRun::new(graph, "a".to_string(), Box::new(ScriptedOracle::new([])));

        assert_eq!(run.step(), StepOutcome::Continue);
        assert_eq!(run.current_node().map(String::as_str), Some("b"));
        // No skipped entries for plain first-edge selection
        assert!(run.take_logs().iter().all(|e| e.status != LogStatus::Skipped));
    }
}
