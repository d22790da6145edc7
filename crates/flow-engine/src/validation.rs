//! Structural validation for workflow graphs
//!
//! Derives advisory warnings from graph structure. Warnings never block
//! editing or simulation; the simulator applies its own policy (first
//! candidate wins) when the structure is ambiguous.

use std::collections::HashSet;

use crate::types::{WorkflowEdge, WorkflowGraph, WorkflowNode};

/// Advisory warning about workflow structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// More than one candidate start node; simulation executes the first
    MultipleStartNodes { count: usize },
    /// A non-empty graph with no trigger node free of incoming edges
    NoStartNode,
    /// An edge references a node id that does not exist
    DanglingEdge { edge_id: String, node_id: String },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultipleStartNodes { count } => {
                write!(
                    f,
                    "Multiple start nodes detected ({count}); only the first will execute"
                )
            }
            Self::NoStartNode => {
                write!(
                    f,
                    "No valid start node. Create a manual or webhook trigger node without incoming edges"
                )
            }
            Self::DanglingEdge { edge_id, node_id } => {
                write!(f, "Edge '{edge_id}' references unknown node '{node_id}'")
            }
        }
    }
}

/// Find all candidate start nodes
///
/// A node is a candidate iff it is a trigger type (`manual` or `webhook`)
/// and no edge targets it. Candidates are returned in node order.
pub fn start_nodes<'a>(
    nodes: &'a [WorkflowNode],
    edges: &[WorkflowEdge],
) -> Vec<&'a WorkflowNode> {
    let targets: HashSet<&str> = edges.iter().map(|e| e.target.as_str()).collect();
    nodes
        .iter()
        .filter(|n| n.is_trigger() && !targets.contains(n.id.as_str()))
        .collect()
}

/// Derive all advisory warnings for a graph
pub fn validation_warnings(graph: &WorkflowGraph) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let starts = start_nodes(&graph.nodes, &graph.edges);
    if starts.len() > 1 {
        warnings.push(ValidationWarning::MultipleStartNodes { count: starts.len() });
    } else if starts.is_empty() && !graph.is_empty() {
        warnings.push(ValidationWarning::NoStartNode);
    }

    collect_dangling_edges(graph, &mut warnings);
    warnings
}

/// Check that all edge source/target nodes exist
fn collect_dangling_edges(graph: &WorkflowGraph, warnings: &mut Vec<ValidationWarning>) {
    let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    for edge in &graph.edges {
        if !node_ids.contains(edge.source.as_str()) {
            warnings.push(ValidationWarning::DanglingEdge {
                edge_id: edge.id.clone(),
                node_id: edge.source.clone(),
            });
        }
        if !node_ids.contains(edge.target.as_str()) {
            warnings.push(ValidationWarning::DanglingEdge {
                edge_id: edge.id.clone(),
                node_id: edge.target.clone(),
            });
        }
    }
}
