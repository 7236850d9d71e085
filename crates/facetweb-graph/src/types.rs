//! Core graph types: node identity, edges, and the serialized graph.

use std::collections::HashMap;

use facetweb_core::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

/// Position of a term in first-seen order. The root is always `0`.
pub type NodeId = usize;

/// Id of the root term.
pub const ROOT_ID: NodeId = 0;

// ============================================================================
// NodeMap
// ============================================================================

/// Bijective term to id mapping, built incrementally.
///
/// Ids are handed out sequentially in insertion order. Terms compare by
/// exact string equality: `Fever` and `fever` are different nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    terms: Vec<String>,
    ids: HashMap<String, NodeId>,
}

impl NodeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `term`, assigning the next free id if unseen.
    pub fn get_or_insert(&mut self, term: &str) -> NodeId {
        if let Some(&id) = self.ids.get(term) {
            return id;
        }
        let id = self.terms.len();
        self.terms.push(term.to_string());
        self.ids.insert(term.to_string(), id);
        id
    }

    /// Look up the id of a term.
    pub fn id_of(&self, term: &str) -> Option<NodeId> {
        self.ids.get(term).copied()
    }

    /// Look up the term for an id.
    pub fn term(&self, id: NodeId) -> Option<&str> {
        self.terms.get(id).map(String::as_str)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the map holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in id order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

// ============================================================================
// Graph
// ============================================================================

/// A directed edge between two node ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
}

impl Edge {
    /// Create a new edge.
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    /// Whether the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A labelled node in the output graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Display label.
    pub name: String,
}

impl GraphNode {
    /// Create a node from a raw term, sanitizing the label.
    pub fn from_term(term: &str) -> Self {
        Self {
            name: sanitize_label(term),
        }
    }
}

/// The expansion graph, ready for a force-directed layout.
///
/// Serializes as `{"nodes": [{"name": ..}], "edges": [{"source": n, "target": m}]}`
/// where `source` and `target` index into `nodes`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes in id order.
    pub nodes: Vec<GraphNode>,
    /// Edges in creation order.
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Assemble a graph from a node map and an edge list.
    pub fn from_parts(nodes: &NodeMap, edges: Vec<Edge>) -> Self {
        Self {
            nodes: nodes.terms().map(GraphNode::from_term).collect(),
            edges,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Label of a node.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    /// Label of the root node.
    pub fn root_label(&self) -> Option<&str> {
        self.label(ROOT_ID)
    }

    /// Convert to a petgraph graph for analysis.
    ///
    /// Edges with an endpoint outside `nodes` are skipped.
    pub fn to_petgraph(&self) -> DiGraph<&str, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        for node in &self.nodes {
            graph.add_node(node.name.as_str());
        }
        for edge in &self.edges {
            if edge.source < self.nodes.len() && edge.target < self.nodes.len() {
                graph.add_edge(NodeIndex::new(edge.source), NodeIndex::new(edge.target), ());
            }
        }
        graph
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Display label for a term: the term with every `"` removed.
pub fn sanitize_label(term: &str) -> String {
    term.replace('"', "")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_map_assigns_sequential_ids() {
        let mut map = NodeMap::new();
        assert!(map.is_empty());
        assert_eq!(map.get_or_insert("aspirin"), 0);
        assert_eq!(map.get_or_insert("headache"), 1);
        assert_eq!(map.get_or_insert("aspirin"), 0);
        assert_eq!(map.get_or_insert("fever"), 2);
        assert_eq!(map.len(), 3);
        assert_eq!(map.id_of("headache"), Some(1));
        assert_eq!(map.term(2), Some("fever"));
        assert_eq!(map.term(3), None);
    }

    #[test]
    fn test_node_map_is_case_sensitive() {
        let mut map = NodeMap::new();
        let lower = map.get_or_insert("fever");
        let upper = map.get_or_insert("Fever");
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label(r#"drug "x""#), "drug x");
        assert_eq!(sanitize_label("plain"), "plain");
        assert_eq!(sanitize_label("\"\""), "");
    }

    #[test]
    fn test_graph_from_parts() {
        let mut map = NodeMap::new();
        map.get_or_insert("aspirin");
        map.get_or_insert("say \"ah\"");
        let graph = Graph::from_parts(&map, vec![Edge::new(0, 1)]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.root_label(), Some("aspirin"));
        assert_eq!(graph.label(1), Some("say ah"));
    }

    #[test]
    fn test_graph_json_shape() {
        let mut map = NodeMap::new();
        map.get_or_insert("aspirin");
        map.get_or_insert("headache");
        let graph = Graph::from_parts(&map, vec![Edge::new(0, 1)]);

        let json = graph.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"nodes":[{"name":"aspirin"},{"name":"headache"}],"edges":[{"source":0,"target":1}]}"#
        );
    }

    #[test]
    fn test_graph_json_escapes_labels() {
        let mut map = NodeMap::new();
        map.get_or_insert(r"back\slash");
        let graph = Graph::from_parts(&map, Vec::new());

        let value: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
        assert_eq!(value["nodes"][0]["name"], r"back\slash");
        assert_eq!(value["edges"], serde_json::json!([]));
    }

    #[test]
    fn test_to_petgraph_skips_dangling_edges() {
        let graph = Graph {
            nodes: vec![GraphNode::from_term("a"), GraphNode::from_term("b")],
            edges: vec![Edge::new(0, 1), Edge::new(1, 7)],
        };
        let pg = graph.to_petgraph();
        assert_eq!(pg.node_count(), 2);
        assert_eq!(pg.edge_count(), 1);
    }

    #[test]
    fn test_edge_self_loop() {
        assert!(Edge::new(2, 2).is_self_loop());
        assert!(!Edge::new(0, 2).is_self_loop());
    }
}
