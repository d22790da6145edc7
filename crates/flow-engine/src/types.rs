//! Core types for workflow graphs
//!
//! These types define the structure of workflow graphs (nodes, edges,
//! and the committed snapshot) plus the activity log entries produced
//! by simulation runs. The engine treats node payloads as opaque: only
//! the trigger types and the `condition` tag are interpreted.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Node types that act as workflow entry points
pub const TRIGGER_TYPES: [&str; 2] = ["manual", "webhook"];

/// Node type evaluated as a two-way branch during simulation
pub const CONDITION_TYPE: &str = "condition";

/// Branch tag carried by the source handle of a condition's passing edge
pub const BRANCH_TRUE: &str = "true";

/// Branch tag carried by the source handle of a condition's failing edge
pub const BRANCH_FALSE: &str = "false";

/// Position of a node on the canvas (layout only, opaque to the engine)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Saved canvas viewport, persisted independently of graph history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

/// A node instance in a workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Node type tag (e.g. "manual", "http", "condition")
    #[serde(rename = "type")]
    pub node_type: String,
    /// Position on the canvas
    pub position: Position,
    /// Custom data for this instance; a `label` entry, when present,
    /// names the node in log messages
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    /// UI selection flag, opaque to the engine
    #[serde(default)]
    pub selected: bool,
}

impl WorkflowNode {
    /// Whether this node can act as a workflow entry point
    pub fn is_trigger(&self) -> bool {
        TRIGGER_TYPES.contains(&self.node_type.as_str())
    }

    /// Whether this node branches on a drawn outcome during simulation
    pub fn is_condition(&self) -> bool {
        self.node_type == CONDITION_TYPE
    }

    /// Display label for log messages, falling back to the type tag
    pub fn label(&self) -> &str {
        self.data
            .get("label")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.node_type)
    }
}

/// An edge connecting two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
    /// Branch discriminator for condition sources ("true" / "false")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Display text, opaque to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A complete workflow graph, the unit of commit and simulation
///
/// Committed graphs are immutable snapshots: every mutation path builds
/// a new value and hands it to the history manager, so concurrent
/// readers never observe a half-updated graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    /// Nodes in the graph
    pub nodes: Vec<WorkflowNode>,
    /// Edges connecting nodes
    pub edges: Vec<WorkflowEdge>,
}

impl WorkflowGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check whether a node with the given ID exists
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Status of an activity log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Error,
    Skipped,
}

/// One entry in the activity log
///
/// Entries are appended in the order they are produced; the log is
/// cleared at the start of each simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Wall-clock time the entry was produced
    pub timestamp: String,
    /// Node this entry refers to, or [`LogEntry::SYSTEM`]
    pub node_id: NodeId,
    /// Outcome severity
    pub status: LogStatus,
    /// Human-readable message
    pub message: String,
}

impl LogEntry {
    /// Node id used for entries not tied to a specific node
    pub const SYSTEM: &'static str = "system";

    /// Create an entry stamped with the current wall-clock time
    pub fn new(
        node_id: impl Into<String>,
        status: LogStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: now_timestamp(),
            node_id: node_id.into(),
            status,
            message: message.into(),
        }
    }
}

/// Wall-clock timestamp used for history steps and log entries
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
