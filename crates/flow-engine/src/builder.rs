//! Fluent builder for workflow graphs
//!
//! Provides a fluent API for constructing graphs programmatically, used
//! by hosts seeding example workflows and throughout the test suites.

use crate::types::{Position, WorkflowEdge, WorkflowGraph, WorkflowNode};

/// Fluent builder for constructing workflow graphs
///
/// # Example
///
/// ```
/// use flow_engine::builder::WorkflowBuilder;
///
/// let graph = WorkflowBuilder::new()
///     .add_node("trigger-1", "manual", (0.0, 0.0))
///     .with_label("Start here")
///     .add_node("http-1", "http", (200.0, 0.0))
///     .add_edge("trigger-1", "http-1")
///     .build();
///
/// assert_eq!(graph.nodes.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct WorkflowBuilder {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    edge_counter: usize,
}

impl WorkflowBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        node_type: impl Into<String>,
        position: (f64, f64),
    ) -> Self {
        self.nodes.push(WorkflowNode {
            id: id.into(),
            node_type: node_type.into(),
            position: Position {
                x: position.0,
                y: position.1,
            },
            data: serde_json::Value::Null,
            selected: false,
        });
        self
    }

    /// Set data on the most recently added node
    ///
    /// Must be called immediately after `add_node`.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data = data;
        }
        self
    }

    /// Set the display label on the most recently added node
    ///
    /// Must be called immediately after `add_node`; merges into any data
    /// already set.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            if !node.data.is_object() {
                node.data = serde_json::json!({});
            }
            if let Some(map) = node.data.as_object_mut() {
                map.insert("label".to_string(), serde_json::Value::String(label.into()));
            }
        }
        self
    }

    /// Add an edge between two nodes (auto-generates the edge ID)
    pub fn add_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.push_edge(source.into(), target.into(), None);
        self
    }

    /// Add a branch edge carrying a source handle ("true" / "false")
    pub fn add_branch_edge(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        self.push_edge(source.into(), target.into(), Some(handle.into()));
        self
    }

    /// Set the display label on the most recently added edge
    pub fn with_edge_label(mut self, label: impl Into<String>) -> Self {
        if let Some(edge) = self.edges.last_mut() {
            edge.label = Some(label.into());
        }
        self
    }

    /// Build the final graph
    pub fn build(self) -> WorkflowGraph {
        WorkflowGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    fn push_edge(&mut self, source: String, target: String, source_handle: Option<String>) {
        self.edge_counter += 1;
        self.edges.push(WorkflowEdge {
            id: format!("edge-{}", self.edge_counter),
            source,
            target,
            source_handle,
            label: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_nodes_and_edges() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "manual", (0.0, 0.0))
            .add_node("b", "http", (200.0, 0.0))
            .add_edge("a", "b")
            .build();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].id, "edge-1");
        assert_eq!(graph.edges[0].source, "a");
    }

    #[test]
    fn test_with_label_merges_into_data() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "http", (0.0, 0.0))
            .with_data(serde_json::json!({"url": "https://example.com"}))
            .with_label("Fetch")
            .build();

        assert_eq!(graph.nodes[0].label(), "Fetch");
        assert_eq!(graph.nodes[0].data["url"], "https://example.com");
    }

    #[test]
    fn test_branch_edges_carry_handles() {
        let graph = WorkflowBuilder::new()
            .add_node("c", "condition", (0.0, 0.0))
            .add_node("yes", "email", (200.0, -50.0))
            .add_node("no", "sms", (200.0, 50.0))
            .add_branch_edge("c", "yes", "true")
            .with_edge_label("approved")
            .add_branch_edge("c", "no", "false")
            .build();

        assert_eq!(graph.edges[0].source_handle.as_deref(), Some("true"));
        assert_eq!(graph.edges[0].label.as_deref(), Some("approved"));
        assert_eq!(graph.edges[1].source_handle.as_deref(), Some("false"));
    }
}
