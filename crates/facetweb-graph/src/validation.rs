//! Graph validation and integrity checking.
//!
//! Checks a [`Graph`] against the structural guarantees of an expansion:
//! a root node at id 0, edges that point at real nodes, no self-loops, and
//! labels free of double quotes. Repeated edges and unconnected nodes are
//! legal and reported as warnings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::stats::duplicate_edges;
use crate::types::{Graph, ROOT_ID};

// ============================================================================
// Types
// ============================================================================

/// Result of graph validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the graph is valid (no errors).
    pub valid: bool,
    /// Broken guarantees.
    pub errors: Vec<ValidationIssue>,
    /// Legal but noteworthy findings.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error (marks graph as invalid).
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.errors.push(issue);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Total issue count (errors + warnings).
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Find an issue by code.
    pub fn issue(&self, code: &str) -> Option<&ValidationIssue> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .find(|issue| issue.code == code)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A validation issue found in the graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Affected node labels.
    pub nodes: Vec<String>,
    /// Affected edges, as `source -> target`.
    pub edges: Vec<String>,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Attach affected nodes.
    pub fn with_nodes(mut self, nodes: Vec<String>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Attach affected edges.
    pub fn with_edges(mut self, edges: Vec<String>) -> Self {
        self.edges = edges;
        self
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate a graph.
///
/// Errors: `MISSING_ROOT`, `DANGLING_EDGES`, `SELF_LOOPS`, `QUOTED_LABELS`.
/// Warnings: `DUPLICATE_EDGES`, `ORPHAN_NODES`.
pub fn validate_graph(graph: &Graph) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_root(graph, &mut result);
    check_dangling_edges(graph, &mut result);
    check_self_loops(graph, &mut result);
    check_quoted_labels(graph, &mut result);
    check_duplicate_edges(graph, &mut result);
    check_orphans(graph, &mut result);

    result
}

/// Quick check if a graph has any validation errors.
pub fn is_valid(graph: &Graph) -> bool {
    validate_graph(graph).valid
}

// ============================================================================
// Individual checks
// ============================================================================

fn check_root(graph: &Graph, result: &mut ValidationResult) {
    if graph.label(ROOT_ID).is_none() {
        result.add_error(ValidationIssue::new(
            "MISSING_ROOT",
            "Graph has no root node",
        ));
    }
}

fn check_dangling_edges(graph: &Graph, result: &mut ValidationResult) {
    let n = graph.node_count();
    let dangling: Vec<String> = graph
        .edges
        .iter()
        .filter(|e| e.source >= n || e.target >= n)
        .map(|e| format!("{} -> {}", e.source, e.target))
        .collect();

    if !dangling.is_empty() {
        result.add_error(
            ValidationIssue::new(
                "DANGLING_EDGES",
                format!("{} edge(s) reference missing nodes", dangling.len()),
            )
            .with_edges(dangling),
        );
    }
}

fn check_self_loops(graph: &Graph, result: &mut ValidationResult) {
    let self_loops: Vec<String> = graph
        .edges
        .iter()
        .filter(|e| e.is_self_loop())
        .map(|e| format!("{} -> {}", e.source, e.target))
        .collect();

    if !self_loops.is_empty() {
        result.add_error(
            ValidationIssue::new(
                "SELF_LOOPS",
                format!("{} edge(s) are self-loops", self_loops.len()),
            )
            .with_edges(self_loops),
        );
    }
}

fn check_quoted_labels(graph: &Graph, result: &mut ValidationResult) {
    let quoted: Vec<String> = graph
        .nodes
        .iter()
        .filter(|node| node.name.contains('"'))
        .map(|node| node.name.clone())
        .collect();

    if !quoted.is_empty() {
        result.add_error(
            ValidationIssue::new(
                "QUOTED_LABELS",
                format!("{} label(s) contain double quotes", quoted.len()),
            )
            .with_nodes(quoted),
        );
    }
}

fn check_duplicate_edges(graph: &Graph, result: &mut ValidationResult) {
    let duplicates: Vec<String> = duplicate_edges(graph)
        .iter()
        .map(|e| format!("{} -> {}", e.source, e.target))
        .collect();

    if !duplicates.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "DUPLICATE_EDGES",
                format!("{} duplicate edge(s) found", duplicates.len()),
            )
            .with_edges(duplicates),
        );
    }
}

/// Nodes with no edges. A lone root is a valid empty expansion and is not
/// reported.
fn check_orphans(graph: &Graph, result: &mut ValidationResult) {
    if graph.node_count() <= 1 {
        return;
    }

    let connected: HashSet<usize> = graph
        .edges
        .iter()
        .flat_map(|e| [e.source, e.target])
        .collect();
    let orphans: Vec<String> = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(id, _)| !connected.contains(id))
        .map(|(_, node)| node.name.clone())
        .collect();

    if !orphans.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "ORPHAN_NODES",
                format!("{} node(s) have no connections", orphans.len()),
            )
            .with_nodes(orphans),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, GraphNode};

    fn graph(labels: &[&str], edges: &[(usize, usize)]) -> Graph {
        Graph {
            nodes: labels.iter().map(|l| GraphNode::from_term(l)).collect(),
            edges: edges.iter().map(|&(s, t)| Edge::new(s, t)).collect(),
        }
    }

    fn create_valid_graph() -> Graph {
        graph(
            &["aspirin", "headache", "fever", "migraine"],
            &[(0, 1), (0, 2), (1, 3)],
        )
    }

    // ------------------------------------------------------------------------
    // Full validation
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_valid_graph() {
        let result = validate_graph(&create_valid_graph());

        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert!(is_valid(&create_valid_graph()));
    }

    #[test]
    fn test_root_only_graph_is_clean() {
        let result = validate_graph(&graph(&["*"], &[]));

        assert!(result.valid);
        assert_eq!(result.total_issues(), 0);
    }

    #[test]
    fn test_missing_root() {
        let result = validate_graph(&Graph::default());

        assert!(!result.valid);
        assert!(result.issue("MISSING_ROOT").is_some());
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    #[test]
    fn test_dangling_edge_detection() {
        let result = validate_graph(&graph(&["a", "b"], &[(0, 1), (1, 5)]));

        assert!(!result.valid);
        let issue = result.issue("DANGLING_EDGES").unwrap();
        assert_eq!(issue.edges, vec!["1 -> 5"]);
    }

    #[test]
    fn test_self_loop_detection() {
        let result = validate_graph(&graph(&["a", "b"], &[(0, 1), (1, 1)]));

        assert!(!result.valid);
        assert_eq!(result.issue("SELF_LOOPS").unwrap().edges, vec!["1 -> 1"]);
    }

    #[test]
    fn test_quoted_label_detection() {
        let mut g = create_valid_graph();
        g.nodes.push(GraphNode {
            name: "drug \"x\"".to_string(),
        });
        g.edges.push(Edge::new(0, 4));

        let result = validate_graph(&g);
        assert!(!result.valid);
        assert_eq!(result.issue("QUOTED_LABELS").unwrap().nodes.len(), 1);
    }

    // ------------------------------------------------------------------------
    // Warnings
    // ------------------------------------------------------------------------

    #[test]
    fn test_duplicate_edges_are_warnings() {
        let result = validate_graph(&graph(&["a", "b"], &[(0, 1), (0, 1)]));

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, "DUPLICATE_EDGES");
    }

    #[test]
    fn test_reverse_edge_is_not_duplicate() {
        let result = validate_graph(&graph(&["a", "b"], &[(0, 1), (1, 0)]));
        assert!(result.issue("DUPLICATE_EDGES").is_none());
    }

    #[test]
    fn test_orphan_detection() {
        let result = validate_graph(&graph(&["a", "b", "lonely"], &[(0, 1)]));

        assert!(result.valid);
        let issue = result.issue("ORPHAN_NODES").unwrap();
        assert_eq!(issue.nodes, vec!["lonely"]);
    }

    // ------------------------------------------------------------------------
    // ValidationResult API
    // ------------------------------------------------------------------------

    #[test]
    fn test_validation_result_counts() {
        let mut result = ValidationResult::default();
        assert!(result.valid);

        result.add_warning(ValidationIssue::new("W", "warning"));
        assert!(result.valid);
        result.add_error(ValidationIssue::new("E", "error"));
        assert!(!result.valid);
        assert_eq!(result.total_issues(), 2);
    }

    #[test]
    fn test_validation_result_serialization() {
        let mut result = ValidationResult::new();
        result.add_error(
            ValidationIssue::new("SELF_LOOPS", "loop").with_edges(vec!["1 -> 1".to_string()]),
        );

        let json = serde_json::to_string(&result).unwrap();
        let parsed: ValidationResult = serde_json::from_str(&json).unwrap();

        assert!(!parsed.valid);
        assert_eq!(parsed.errors[0].edges, vec!["1 -> 1"]);
    }
}
