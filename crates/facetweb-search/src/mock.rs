//! Scripted search backend for tests and demos.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use facetweb_core::{Error, Result};
use tokio::sync::Mutex;

use crate::backend::SearchBackend;
use crate::types::{FacetCount, FacetRequest, FacetResult};

/// Search backend that answers from canned responses keyed by query string.
///
/// Queries without a scripted answer return an empty facet list. Scripted
/// failures surface as [`Error::BackendUnavailable`]. Every request is
/// recorded so tests can assert on what was asked, in order.
#[derive(Clone, Default)]
pub struct ScriptedSearchBackend {
    responses: HashMap<String, std::result::Result<Vec<FacetCount>, String>>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<FacetRequest>>>,
}

impl ScriptedSearchBackend {
    /// Create a backend with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the facet values returned for `query`.
    ///
    /// Counts are synthesized in descending order so the script reads like
    /// a real backend response.
    ///
    /// # Examples
    ///
    /// ```
    /// use facetweb_search::ScriptedSearchBackend;
    ///
    /// let backend = ScriptedSearchBackend::new()
    ///     .with_facets("aspirin", ["headache", "fever"])
    ///     .with_failure("(aspirin) AND \"fever\"", "timed out");
    /// ```
    pub fn with_facets<I, S>(mut self, query: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        let total = terms.len() as u64;
        let counts = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| FacetCount::new(term, total - i as u64))
            .collect();
        self.responses.insert(query.into(), Ok(counts));
        self
    }

    /// Script a backend failure for `query`.
    pub fn with_failure(mut self, query: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.insert(query.into(), Err(message.into()));
        self
    }

    /// Sleep for `delay` before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Load a script from a JSON object mapping query strings to term lists.
    ///
    /// ```json
    /// { "aspirin": ["headache", "fever"], "(aspirin) AND \"headache\"": ["migraine"] }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let script: HashMap<String, Vec<String>> = serde_json::from_str(&content)?;
        Ok(script
            .into_iter()
            .fold(Self::new(), |backend, (query, terms)| {
                backend.with_facets(query, terms)
            }))
    }

    /// All requests received so far, in arrival order.
    pub async fn requests(&self) -> Vec<FacetRequest> {
        self.requests.lock().await.clone()
    }

    /// The query strings received so far, in arrival order.
    pub async fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.query.clone())
            .collect()
    }
}

#[async_trait]
impl SearchBackend for ScriptedSearchBackend {
    async fn search(&self, request: FacetRequest) -> Result<FacetResult> {
        self.requests.lock().await.push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.get(&request.query) {
            Some(Ok(values)) => {
                let mut values = values.clone();
                values.truncate(request.max_facet_values);
                Ok(FacetResult::new(values))
            }
            Some(Err(message)) => Err(Error::backend(message.clone())),
            None => Ok(FacetResult::default()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_response() {
        let backend = ScriptedSearchBackend::new().with_facets("aspirin", ["headache", "fever"]);

        let result = backend
            .search(FacetRequest::new("aspirin", "symptom", 15))
            .await
            .unwrap();

        assert_eq!(result.terms().collect::<Vec<_>>(), vec!["headache", "fever"]);
        assert_eq!(result.values[0].count, 2);
        assert_eq!(result.values[1].count, 1);
    }

    #[tokio::test]
    async fn test_unscripted_query_is_empty() {
        let backend = ScriptedSearchBackend::new();
        let result = backend
            .search(FacetRequest::new("anything", "symptom", 3))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let backend = ScriptedSearchBackend::new().with_failure("aspirin", "connection reset");
        let err = backend
            .search(FacetRequest::new("aspirin", "symptom", 15))
            .await
            .unwrap_err();
        assert!(err.is_backend_failure());
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_respects_max_facet_values() {
        let backend = ScriptedSearchBackend::new().with_facets("q", ["a", "b", "c", "d", "e"]);
        let result = backend
            .search(FacetRequest::new("q", "f", 3))
            .await
            .unwrap();
        assert_eq!(result.values.len(), 3);
    }

    #[tokio::test]
    async fn test_records_requests_in_order() {
        let backend = ScriptedSearchBackend::new();
        let shared = backend.clone();

        backend.search(FacetRequest::new("one", "f", 1)).await.unwrap();
        shared.search(FacetRequest::new("two", "f", 1)).await.unwrap();

        assert_eq!(backend.queries().await, vec!["one", "two"]);
        assert_eq!(backend.requests().await[0].top, 0);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, r#"{"aspirin": ["headache", "fever"]}"#).unwrap();

        let backend = ScriptedSearchBackend::from_json_file(&path).unwrap();
        let result = tokio_test::block_on(backend.search(FacetRequest::new("aspirin", "s", 15)))
            .unwrap();
        assert_eq!(result.values.len(), 2);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(ScriptedSearchBackend::from_json_file(&path).is_err());
    }
}
