//! Graph statistics and analysis.
//!
//! Provides functions for summarizing an expansion graph: size, degree
//! distribution, repeated edges, and top-node rankings.

use std::collections::HashSet;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::types::{Edge, Graph};

// ============================================================================
// Types
// ============================================================================

/// Summary statistics about a graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total number of nodes.
    pub node_count: usize,
    /// Total number of edges, repeats included.
    pub edge_count: usize,
    /// Edges that repeat an earlier (source, target) pair.
    pub duplicate_edge_count: usize,
    /// Nodes without any edges.
    pub orphan_count: usize,
    /// Average edges per node (in + out).
    pub avg_degree: f32,
    /// Maximum in-degree.
    pub max_in_degree: usize,
    /// Maximum out-degree.
    pub max_out_degree: usize,
    /// Label of the node with the highest in-degree.
    pub most_linked_to: Option<String>,
    /// Label of the node with the highest out-degree.
    pub most_linking: Option<String>,
}

/// Direction for degree calculation.
#[derive(Clone, Copy, Debug)]
pub enum DegreeDirection {
    /// Incoming edges only.
    In,
    /// Outgoing edges only.
    Out,
    /// Both directions.
    Both,
}

// ============================================================================
// Functions
// ============================================================================

/// Compute statistics for a graph.
///
/// Ties for the maximum degree go to the lowest node id.
pub fn compute_stats(graph: &Graph) -> GraphStats {
    let pg = graph.to_petgraph();
    let node_count = pg.node_count();

    let in_degrees: Vec<usize> = pg
        .node_indices()
        .map(|idx| pg.edges_directed(idx, Direction::Incoming).count())
        .collect();
    let out_degrees: Vec<usize> = pg
        .node_indices()
        .map(|idx| pg.edges_directed(idx, Direction::Outgoing).count())
        .collect();

    let orphan_count = in_degrees
        .iter()
        .zip(&out_degrees)
        .filter(|&(&i, &o)| i == 0 && o == 0)
        .count();

    let total_degree: usize = in_degrees.iter().sum::<usize>() + out_degrees.iter().sum::<usize>();
    let avg_degree = if node_count > 0 {
        total_degree as f32 / node_count as f32
    } else {
        0.0
    };

    let (most_linked_to, max_in_degree) = max_degree(&pg, &in_degrees);
    let (most_linking, max_out_degree) = max_degree(&pg, &out_degrees);

    GraphStats {
        node_count,
        edge_count: graph.edge_count(),
        duplicate_edge_count: duplicate_edges(graph).len(),
        orphan_count,
        avg_degree,
        max_in_degree,
        max_out_degree,
        most_linked_to,
        most_linking,
    }
}

/// Edges that repeat an earlier (source, target) pair, in order.
pub fn duplicate_edges(graph: &Graph) -> Vec<Edge> {
    let mut seen = HashSet::new();
    graph
        .edges
        .iter()
        .filter(|edge| !seen.insert(**edge))
        .copied()
        .collect()
}

/// Get a quick summary of graph size.
pub fn quick_summary(graph: &Graph) -> String {
    format!("{} nodes, {} edges", graph.node_count(), graph.edge_count())
}

/// Get the top `limit` node labels by degree.
pub fn top_nodes_by_degree(
    graph: &Graph,
    limit: usize,
    direction: DegreeDirection,
) -> Vec<(String, usize)> {
    let pg = graph.to_petgraph();
    let mut scores: Vec<(String, usize)> = pg
        .node_indices()
        .map(|idx| {
            let degree = match direction {
                DegreeDirection::In => pg.edges_directed(idx, Direction::Incoming).count(),
                DegreeDirection::Out => pg.edges_directed(idx, Direction::Outgoing).count(),
                DegreeDirection::Both => {
                    pg.edges_directed(idx, Direction::Incoming).count()
                        + pg.edges_directed(idx, Direction::Outgoing).count()
                }
            };
            (pg[idx].to_string(), degree)
        })
        .collect();

    // Stable sort keeps id order among equal degrees.
    scores.sort_by(|a, b| b.1.cmp(&a.1));
    scores.truncate(limit);
    scores
}

fn max_degree(pg: &DiGraph<&str, ()>, degrees: &[usize]) -> (Option<String>, usize) {
    degrees
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (idx, &degree)| match best {
            Some((_, top)) if top >= degree => best,
            _ => Some((idx, degree)),
        })
        .map(|(idx, degree)| (Some(pg[NodeIndex::new(idx)].to_string()), degree))
        .unwrap_or((None, 0))
}

// ============================================================================
// Tests
// ============================================================================
