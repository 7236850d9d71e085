//! Search backend trait and backend factory.
//!
//! The facet layer depends on exactly one capability of a search engine:
//! "top-N facet values and counts for a query, restricted to a field".
//! [`SearchBackend`] is that capability. Document retrieval, highlighting
//! and filter composition are deliberately absent.

use std::sync::Arc;

use async_trait::async_trait;
use facetweb_core::{Error, Result};

use crate::azure::AzureSearchBackend;
use crate::mock::ScriptedSearchBackend;
use crate::types::{FacetRequest, FacetResult, SearchConfig};

/// Trait for search engines that can report facet counts.
///
/// Implementations own their timeout policy; callers make at most one
/// attempt per request.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Return the top facet values of `request.field` for `request.query`.
    ///
    /// # Errors
    ///
    /// - [`Error::BackendUnavailable`] if the backend could not be reached,
    ///   timed out, or rejected the query.
    /// - [`Error::MalformedResponse`] if the response lacks the requested
    ///   facet field.
    async fn search(&self, request: FacetRequest) -> Result<FacetResult>;

    /// The backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Create the backend selected by `config.backend`.
///
/// # Errors
///
/// Returns a configuration error for unknown backend names, for `tantivy`
/// when the crate was built without `fts-tantivy`, or when the selected
/// backend is missing required settings.
pub fn create_search_backend(config: &SearchConfig) -> Result<Arc<dyn SearchBackend>> {
    log::debug!("Creating search backend '{}'", config.backend);
    match config.backend.as_str() {
        "azure" => Ok(Arc::new(AzureSearchBackend::new(config)?)),
        "mock" => {
            let backend = match config.mock_script {
                Some(ref path) => ScriptedSearchBackend::from_json_file(path)?,
                None => ScriptedSearchBackend::new(),
            };
            Ok(Arc::new(backend))
        }
        #[cfg(feature = "fts-tantivy")]
        "tantivy" => Ok(Arc::new(crate::tantivy_search::TantivyFacetBackend::new(
            config,
        )?)),
        #[cfg(not(feature = "fts-tantivy"))]
        "tantivy" => Err(Error::config(
            "the tantivy backend requires the `fts-tantivy` feature",
        )),
        other => Err(Error::config(format!("Unknown search backend: {other}"))),
    }
}

// ============================================================================
// Tests
// ============================================================================
