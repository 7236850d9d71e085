//! Common types for the facet query layer.
//!
//! These types are shared by all backends and are always available
//! regardless of feature flags.

use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration
// ============================================================================

/// Search backend configuration.
///
/// Controls backend selection and the connection details of each backend.
/// Only the fields relevant to the selected backend are read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Backend type: "azure", "tantivy", or "mock".
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Facet field used when a request does not name one.
    #[serde(default = "default_field")]
    pub default_field: String,

    /// Service endpoint for the REST backend (falls back to `SEARCH_ENDPOINT`).
    pub endpoint: Option<String>,

    /// Index name for the REST backend.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// API key for the REST backend (falls back to `SEARCH_API_KEY`).
    pub api_key: Option<String>,

    /// REST API version.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout for the REST backend, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Path to a local Tantivy index.
    pub index_path: Option<String>,

    /// Facet fields written by the local indexer.
    #[serde(default = "default_facet_fields")]
    pub facet_fields: Vec<String>,

    /// JSON file of canned responses for the mock backend.
    pub mock_script: Option<String>,
}

fn default_backend() -> String {
    "azure".to_string()
}

fn default_field() -> String {
    "keyphrases".to_string()
}

fn default_index_name() -> String {
    "medical-tutorial".to_string()
}

fn default_api_version() -> String {
    "2023-11-01".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_facet_fields() -> Vec<String> {
    vec![default_field()]
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            default_field: default_field(),
            endpoint: None,
            index_name: default_index_name(),
            api_key: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            index_path: None,
            facet_fields: default_facet_fields(),
            mock_script: None,
        }
    }
}

// ============================================================================
// Request / response types
// ============================================================================

/// A facet-only search request.
///
/// `top` is the number of documents to return alongside the facets; the
/// facet layer always sends 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRequest {
    /// Query string in the backend's full query syntax.
    pub query: String,

    /// The facetable field to count values of.
    pub field: String,

    /// Maximum number of distinct facet values to return.
    pub max_facet_values: usize,

    /// Number of matching documents to return.
    pub top: usize,
}

impl FacetRequest {
    /// Create a facet request that asks for no documents.
    pub fn new(
        query: impl Into<String>,
        field: impl Into<String>,
        max_facet_values: usize,
    ) -> Self {
        Self {
            query: query.into(),
            field: field.into(),
            max_facet_values,
            top: 0,
        }
    }
}

/// A single facet value and the number of matching documents carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    /// The facet value.
    pub term: String,

    /// Document count for this value.
    pub count: u64,
}

impl FacetCount {
    /// Create a new facet count.
    pub fn new(term: impl Into<String>, count: u64) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }
}

/// Facet values returned by a backend, in backend order (highest count first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetResult {
    /// The facet values.
    pub values: Vec<FacetCount>,
}

impl FacetResult {
    /// Create a result from facet counts.
    pub fn new(values: Vec<FacetCount>) -> Self {
        Self { values }
    }

    /// Whether no values were returned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The facet values without their counts.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.term.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
