//! HTTP surface for graph expansion.
//!
//! - `GET /api/graph?q=<term>&field=<facet>` returns the expansion graph.
//! - `GET /api/health` reports the backend in use.

use crate::config::FacetwebConfig;
use crate::expand_handlers::graph_builder;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use facetweb_core::{Error, Result};
use facetweb_graph::{Graph, GraphBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Shared state for request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    builder: GraphBuilder,
    backend: String,
    default_field: String,
}

impl AppState {
    /// Create handler state from a builder.
    pub fn new(
        builder: GraphBuilder,
        backend: impl Into<String>,
        default_field: impl Into<String>,
    ) -> Self {
        Self {
            builder,
            backend: backend.into(),
            default_field: default_field.into(),
        }
    }

    /// Create handler state from configuration.
    pub fn from_config(config: &FacetwebConfig) -> Result<Self> {
        Ok(Self::new(
            graph_builder(config)?,
            config.search.backend.clone(),
            config.search.default_field.clone(),
        ))
    }
}

/// Query parameters of `GET /api/graph`.
#[derive(Debug, Default, Deserialize)]
pub struct GraphParams {
    /// Root term. Missing or blank expands the whole index.
    pub q: Option<String>,
    /// Facet field.
    pub field: Option<String>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: String,
    /// Configured backend name.
    pub backend: String,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/graph", get(graph_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

async fn graph_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GraphParams>,
) -> Json<Graph> {
    let term = params.q.unwrap_or_default();
    let field = params.field.unwrap_or_else(|| state.default_field.clone());
    let (graph, report) = state.builder.build_with_report(&term, &field).await;
    info!(
        term = %term,
        field = %field,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        failures = report.failures.len(),
        "graph request served"
    );
    Json(graph)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: state.backend.clone(),
    })
}

/// Run the HTTP server until Ctrl-C.
pub async fn serve(config: &FacetwebConfig, port: Option<u16>) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::operation(format!("Failed to bind {addr}: {e}")))?;

    info!("facetweb listening on http://{addr} (backend: {})", state.backend);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::operation(format!("Server error: {e}")))?;

    info!("facetweb server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// Tests
// ============================================================================
