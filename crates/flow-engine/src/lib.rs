//! Flow Engine - workflow state engine for Flowdeck
//!
//! This crate provides the state machinery behind a visual workflow
//! builder. It supports:
//!
//! - Bounded, branching-aware undo/redo over immutable graph snapshots
//! - Simulated, cancellable execution with condition branching
//! - Advisory structural validation (start-node discovery)
//! - Best-effort persistence through an opaque blob-store gateway
//!
//! # Architecture
//!
//! Committed graphs are value snapshots: every edit builds a new
//! [`WorkflowGraph`] and hands it to the [`HistoryManager`], which owns
//! the `present`/`past`/`future` slots exclusively. The [`Simulator`]
//! reads one committed snapshot per run and owns the transient cursor
//! and activity log; it never touches history.
//!
//! # Example
//!
//! ```
//! use flow_engine::builder::WorkflowBuilder;
//! use flow_engine::validation;
//!
//! let graph = WorkflowBuilder::new()
//!     .add_node("trigger-1", "manual", (0.0, 0.0))
//!     .add_node("http-1", "http", (200.0, 0.0))
//!     .add_edge("trigger-1", "http-1")
//!     .build();
//!
//! let starts = validation::start_nodes(&graph.nodes, &graph.edges);
//! assert_eq!(starts[0].id, "trigger-1");
//! ```

pub mod builder;
pub mod error;
pub mod events;
pub mod history;
pub mod simulation;
pub mod store;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::WorkflowBuilder;
pub use error::{EngineError, Result};
pub use events::{EventSink, NullEventSink, SimulationEvent, VecEventSink};
pub use history::{HistoryManager, HistoryStep, StepInfo, DEFAULT_HISTORY_BOUND};
pub use simulation::{
    BranchOracle, PassRateOracle, RunStatus, ScriptedOracle, SimulationRun, Simulator,
    StepOutcome, DEFAULT_NODE_DELAY, DEFAULT_PASS_RATE, DEFAULT_STEP_BUDGET,
};
pub use store::{BlobStore, FileBlobStore, MemoryBlobStore, VIEWPORT_KEY, WORKFLOW_KEY};
pub use types::{
    EdgeId, LogEntry, LogStatus, NodeId, Position, Viewport, WorkflowEdge, WorkflowGraph,
    WorkflowNode,
};
pub use validation::{start_nodes, validation_warnings, ValidationWarning};
