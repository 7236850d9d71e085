//! Three-level facet expansion.
//!
//! Starting from a root query, [`GraphBuilder`] fetches the root's top facet
//! values (level 2), then for each of those fetches the top facet values of
//! the root scoped to that value (level 3). Every distinct term becomes one
//! node; every discovery becomes one edge.
//!
//! ```text
//! aspirin ──► headache ──► migraine
//!    │
//!    └──────► fever
//! ```
//!
//! Backend failures never abort a build: the failing step contributes
//! nothing and is recorded in the [`ExpansionReport`].

use std::sync::atomic::{AtomicUsize, Ordering};

use facetweb_core::Result;
use facetweb_search::{FacetCount, FacetQuery, composite_query, or_match_all};
use futures::StreamExt;
use futures::stream;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::ExpansionConfig;
use crate::types::{Edge, Graph, NodeId, NodeMap, ROOT_ID};

// ============================================================================
// Report
// ============================================================================

/// A facet query that failed during expansion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedQuery {
    /// The query string sent to the backend.
    pub query: String,
    /// The error message.
    pub error: String,
}

/// What happened while building one graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionReport {
    /// Facet queries started.
    pub queries_issued: usize,
    /// Queries that failed and contributed nothing.
    pub failures: Vec<FailedQuery>,
    /// Whether expansion stopped early on cancellation or deadline.
    pub cancelled: bool,
}

impl ExpansionReport {
    /// Whether every query ran and succeeded.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty()
    }
}

// ============================================================================
// Per-call state
// ============================================================================

/// State owned by a single build.
struct Expansion {
    nodes: NodeMap,
    edges: Vec<Edge>,
    report: ExpansionReport,
}

impl Expansion {
    fn new(root: &str) -> Self {
        let mut nodes = NodeMap::new();
        nodes.get_or_insert(root);
        Self {
            nodes,
            edges: Vec::new(),
            report: ExpansionReport::default(),
        }
    }

    /// Unwrap a query outcome, recording a failure as an empty result.
    fn record(&mut self, query: &str, outcome: Result<Vec<FacetCount>>) -> Vec<FacetCount> {
        match outcome {
            Ok(values) => values,
            Err(e) => {
                log::warn!("facet query failed, skipping: {query}: {e}");
                self.report.failures.push(FailedQuery {
                    query: query.to_string(),
                    error: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Link the root to each level-2 value and return the ids to expand.
    fn merge_level2(&mut self, values: &[FacetCount]) -> Vec<NodeId> {
        let mut queue = Vec::with_capacity(values.len());
        for value in values {
            let id = self.nodes.get_or_insert(&value.term);
            if id != ROOT_ID {
                self.edges.push(Edge::new(ROOT_ID, id));
                queue.push(id);
            }
        }
        queue
    }

    /// Link a level-2 node to each of its level-3 values.
    fn merge_branch(&mut self, parent: NodeId, values: &[FacetCount]) {
        for value in values {
            let id = self.nodes.get_or_insert(&value.term);
            if id != parent {
                self.edges.push(Edge::new(parent, id));
            }
        }
    }

    fn finish(self) -> (Graph, ExpansionReport) {
        (Graph::from_parts(&self.nodes, self.edges), self.report)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds facet expansion graphs.
///
/// A builder holds no per-graph state and can serve concurrent builds.
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    query: FacetQuery,
    config: ExpansionConfig,
}

impl GraphBuilder {
    /// Create a builder over `query` with the given limits.
    pub fn new(query: FacetQuery, config: ExpansionConfig) -> Self {
        Self { query, config }
    }

    /// The expansion settings.
    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Build the expansion graph for `root` over facet `field`.
    ///
    /// A blank root is replaced by the match-all query.
    pub async fn build(&self, root: &str, field: &str) -> Graph {
        self.build_with_report(root, field).await.0
    }

    /// Build the graph and report failed queries.
    pub async fn build_with_report(&self, root: &str, field: &str) -> (Graph, ExpansionReport) {
        self.build_with_cancel(root, field, &CancellationToken::new())
            .await
    }

    /// Build the graph, stopping early when `cancel` fires or the
    /// configured deadline passes.
    ///
    /// On cancellation no further queries are issued, in-flight queries are
    /// dropped, and the graph built so far is returned with
    /// [`ExpansionReport::cancelled`] set.
    pub async fn build_with_cancel(
        &self,
        root: &str,
        field: &str,
        cancel: &CancellationToken,
    ) -> (Graph, ExpansionReport) {
        let token = cancel.child_token();
        let _stop_timer = token.clone().drop_guard();
        if let Some(deadline) = self.config.deadline() {
            let timer = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    () = timer.cancelled() => {}
                    () = tokio::time::sleep(deadline) => {
                        log::warn!("expansion deadline of {deadline:?} reached");
                        timer.cancel();
                    }
                }
            });
        }

        let root = or_match_all(root, &self.config.match_all).to_string();
        log::debug!("expanding '{root}' on field '{field}'");

        let mut state = Expansion::new(&root);
        if token.is_cancelled() {
            state.report.cancelled = true;
            return state.finish();
        }

        // Level 2
        state.report.queries_issued += 1;
        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => None,
            outcome = self.query.fetch(&root, field, self.config.level2_max_facets) => Some(outcome),
        };
        let Some(outcome) = outcome else {
            state.report.cancelled = true;
            return state.finish();
        };
        let values = state.record(&root, outcome);
        let queue = state.merge_level2(&values);

        // Level 3
        let branches: Vec<(NodeId, String)> = queue
            .into_iter()
            .filter_map(|id| {
                let term = state.nodes.term(id)?;
                Some((id, composite_query(&root, term)))
            })
            .collect();

        let issued = AtomicUsize::new(0);
        let max = self.config.level3_max_facets_per_branch;
        let mut responses = std::pin::pin!(
            stream::iter(branches)
                .map(|(parent, query)| {
                    let issued = &issued;
                    async move {
                        issued.fetch_add(1, Ordering::Relaxed);
                        let outcome = self.query.fetch(&query, field, max).await;
                        (parent, query, outcome)
                    }
                })
                .buffered(self.config.effective_concurrency())
        );

        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    state.report.cancelled = true;
                    break;
                }
                next = responses.next() => match next {
                    Some((parent, query, outcome)) => {
                        let values = state.record(&query, outcome);
                        state.merge_branch(parent, &values);
                    }
                    None => break,
                },
            }
        }
        state.report.queries_issued += issued.load(Ordering::Relaxed);

        if state.report.cancelled {
            log::warn!(
                "expansion of '{root}' cancelled after {} queries",
                state.report.queries_issued
            );
        }
        log::info!(
            "expanded '{root}': {} nodes, {} edges, {} failed queries",
            state.nodes.len(),
            state.edges.len(),
            state.report.failures.len()
        );

        state.finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
