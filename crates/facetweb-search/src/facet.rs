//! Facet count retrieval with local failure recovery.
//!
//! [`FacetQuery`] is the only way the graph builder talks to a search
//! backend. Each call is a single attempt: no retries, no caching.

use std::sync::Arc;

use facetweb_core::{Error, Result};

use crate::backend::SearchBackend;
use crate::types::{FacetCount, FacetRequest};

/// Issues facet-only requests against a [`SearchBackend`].
#[derive(Clone)]
pub struct FacetQuery {
    backend: Arc<dyn SearchBackend>,
}

impl FacetQuery {
    /// Create a facet query over `backend`.
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// The underlying backend name.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Fetch up to `max_results` facet values of `field` for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for a blank query (callers substitute
    /// the match-all token before getting here), and passes backend
    /// failures through unchanged.
    pub async fn fetch(
        &self,
        query: &str,
        field: &str,
        max_results: usize,
    ) -> Result<Vec<FacetCount>> {
        if query.trim().is_empty() {
            return Err(Error::invalid_data("facet query must not be empty"));
        }

        log::debug!(
            "facet query [{}] field={field} max={max_results}: {query}",
            self.backend.name()
        );

        let result = self
            .backend
            .search(FacetRequest::new(query, field, max_results))
            .await?;

        let mut values = result.values;
        values.truncate(max_results);
        Ok(values)
    }

    /// Fetch facet values, degrading any failure to an empty list.
    ///
    /// The failure is logged; an empty result means "nothing to expand",
    /// never "abort".
    pub async fn get_facet_counts(
        &self,
        query: &str,
        field: &str,
        max_results: usize,
    ) -> Vec<FacetCount> {
        match self.fetch(query, field, max_results).await {
            Ok(values) => values,
            Err(e) => {
                log::warn!("facet query failed for '{query}' on field '{field}': {e}");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for FacetQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetQuery")
            .field("backend", &self.backend.name())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
