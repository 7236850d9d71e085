//! Handler functions for `facetweb expand`.

use crate::config::FacetwebConfig;
use facetweb_core::Result;
use facetweb_graph::{
    DegreeDirection, ExpansionReport, Graph, GraphBuilder, compute_stats, quick_summary,
    top_nodes_by_degree, validate_graph,
};
use facetweb_search::{FacetQuery, create_search_backend};

// ============================================================================
// Option types
// ============================================================================

/// Options for expand operations.
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
    /// Root term or query; blank expands the whole index.
    pub term: String,
    /// Facet field (defaults to `search.default_field`).
    pub field: Option<String>,
    /// Pretty-print the JSON output.
    pub pretty: bool,
    /// Print statistics and validation to stderr.
    pub stats: bool,
}

// ============================================================================
// Helpers
// ============================================================================

/// Create a graph builder over the configured backend.
pub fn graph_builder(config: &FacetwebConfig) -> Result<GraphBuilder> {
    let backend = create_search_backend(&config.search)?;
    Ok(GraphBuilder::new(
        FacetQuery::new(backend),
        config.expansion.clone(),
    ))
}

/// Expand `term` over `field` (or the configured default field).
pub async fn build_graph(
    config: &FacetwebConfig,
    term: &str,
    field: Option<&str>,
) -> Result<(Graph, ExpansionReport)> {
    let builder = graph_builder(config)?;
    let field = field.unwrap_or(&config.search.default_field);
    Ok(builder.build_with_report(term, field).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// Expand a term and print the graph as JSON on stdout.
pub async fn handle_expand(config: &FacetwebConfig, options: ExpandOptions) -> Result<()> {
    let (graph, report) = build_graph(config, &options.term, options.field.as_deref()).await?;

    let json = if options.pretty {
        graph.to_json_pretty()?
    } else {
        graph.to_json()?
    };
    println!("{json}");

    if !report.is_complete() {
        log::warn!(
            "expansion incomplete: {} failed of {} queries{}",
            report.failures.len(),
            report.queries_issued,
            if report.cancelled { ", cancelled" } else { "" }
        );
    }

    if options.stats {
        print_stats(&graph, &report);
    }

    Ok(())
}

/// Print statistics, failures, and validation findings to stderr.
fn print_stats(graph: &Graph, report: &ExpansionReport) {
    let stats = compute_stats(graph);

    eprintln!("Graph Statistics");
    eprintln!("================");
    eprintln!("Summary:        {}", quick_summary(graph));
    eprintln!("Queries:        {}", report.queries_issued);
    eprintln!("Failures:       {}", report.failures.len());
    eprintln!("Duplicates:     {}", stats.duplicate_edge_count);
    eprintln!("Orphans:        {}", stats.orphan_count);
    eprintln!("Avg degree:     {:.2}", stats.avg_degree);
    eprintln!("Max in-degree:  {}", stats.max_in_degree);
    eprintln!("Max out-degree: {}", stats.max_out_degree);

    if let Some(ref label) = stats.most_linked_to {
        eprintln!("Most linked to: {label} (in-degree: {})", stats.max_in_degree);
    }
    if let Some(ref label) = stats.most_linking {
        eprintln!("Most linking:   {label} (out-degree: {})", stats.max_out_degree);
    }

    let top = top_nodes_by_degree(graph, 5, DegreeDirection::Both);
    if !top.is_empty() {
        eprintln!("\nTop nodes:");
        for (label, degree) in top {
            eprintln!("  {label}: {degree}");
        }
    }

    if !report.failures.is_empty() {
        eprintln!("\nFailed queries:");
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.query, failure.error);
        }
    }

    let result = validate_graph(graph);
    for error in &result.errors {
        eprintln!("  ERROR [{}]: {}", error.code, error.message);
    }
    for warning in &result.warnings {
        eprintln!("  WARN  [{}]: {}", warning.code, warning.message);
    }
}

// ============================================================================
// Tests
// ============================================================================
