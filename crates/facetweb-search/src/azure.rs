//! Azure Cognitive Search compatible REST backend.
//!
//! Sends facet-only search requests (`top: 0`) in full Lucene query syntax
//! with `searchMode: all`, and reads the facet buckets from
//! `@search.facets.<field>`.

use std::time::Duration;

use async_trait::async_trait;
use facetweb_core::{Error, Result};
use serde_json::{Value, json};

use crate::backend::SearchBackend;
use crate::types::{FacetCount, FacetRequest, FacetResult, SearchConfig};

/// REST search backend for Azure Cognitive Search style services.
pub struct AzureSearchBackend {
    endpoint: String,
    index_name: String,
    api_key: String,
    api_version: String,
    client: reqwest::Client,
}

impl AzureSearchBackend {
    /// Create a new REST backend from configuration.
    ///
    /// `endpoint` and `api_key` fall back to the `SEARCH_ENDPOINT` and
    /// `SEARCH_API_KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no endpoint or key is available, or
    /// if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .or_else(|| std::env::var("SEARCH_ENDPOINT").ok())
            .ok_or_else(|| Error::config("search.endpoint (or SEARCH_ENDPOINT) is required"))?;
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("SEARCH_API_KEY").ok())
            .ok_or_else(|| Error::config("search.api_key (or SEARCH_API_KEY) is required"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            api_key,
            api_version: config.api_version.clone(),
            client,
        })
    }

    /// The search URL for the configured index.
    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index_name, self.api_version
        )
    }
}

/// Build the JSON body for a facet-only search.
pub(crate) fn request_body(request: &FacetRequest) -> Value {
    json!({
        "search": request.query,
        "facets": [format!("{},count:{}", request.field, request.max_facet_values)],
        "top": request.top,
        "queryType": "full",
        "searchMode": "all",
    })
}

/// Extract the facet buckets for `field` from a search response body.
pub(crate) fn parse_facets(body: &Value, field: &str) -> Result<Vec<FacetCount>> {
    let buckets = body["@search.facets"][field]
        .as_array()
        .ok_or_else(|| Error::malformed(format!("response has no facets for field '{field}'")))?;

    let values = buckets
        .iter()
        .filter_map(|bucket| {
            let term = match &bucket["value"] {
                Value::String(s) => s.clone(),
                Value::Null => return None,
                other => other.to_string(),
            };
            let count = bucket["count"].as_u64().unwrap_or(0);
            Some(FacetCount::new(term, count))
        })
        .collect();

    Ok(values)
}

#[async_trait]
impl SearchBackend for AzureSearchBackend {
    async fn search(&self, request: FacetRequest) -> Result<FacetResult> {
        let response = self
            .client
            .post(self.search_url())
            .header("api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body(&request))
            .send()
            .await
            .map_err(|e| Error::backend(format!("Failed to call search service: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::backend(format!(
                "Search service error {status}: {error_text}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::malformed(format!("Failed to parse search response: {e}")))?;

        Ok(FacetResult::new(parse_facets(&body, &request.field)?))
    }

    fn name(&self) -> &str {
        "azure"
    }
}

impl std::fmt::Debug for AzureSearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSearchBackend")
            .field("endpoint", &self.endpoint)
            .field("index_name", &self.index_name)
            .field("api_version", &self.api_version)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SearchConfig {
        SearchConfig {
            endpoint: Some("https://example.search.windows.net/".to_string()),
            api_key: Some("secret".to_string()),
            index_name: "medical".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_url() {
        let backend = AzureSearchBackend::new(&test_config()).unwrap();
        assert_eq!(
            backend.search_url(),
            "https://example.search.windows.net/indexes/medical/docs/search?api-version=2023-11-01"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let backend = AzureSearchBackend::new(&test_config()).unwrap();
        let debug = format!("{backend:?}");
        assert!(debug.contains("AzureSearchBackend"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_request_body() {
        let body = request_body(&FacetRequest::new("(aspirin) AND \"fever\"", "symptom", 3));
        assert_eq!(body["search"], "(aspirin) AND \"fever\"");
        assert_eq!(body["facets"][0], "symptom,count:3");
        assert_eq!(body["top"], 0);
        assert_eq!(body["queryType"], "full");
        assert_eq!(body["searchMode"], "all");
    }

    #[test]
    fn test_parse_facets() {
        let body = json!({
            "@search.facets": {
                "symptom": [
                    {"value": "headache", "count": 12},
                    {"value": "fever", "count": 4}
                ]
            },
            "value": []
        });
        let values = parse_facets(&body, "symptom").unwrap();
        assert_eq!(
            values,
            vec![FacetCount::new("headache", 12), FacetCount::new("fever", 4)]
        );
    }

    #[test]
    fn test_parse_facets_non_string_values() {
        let body = json!({
            "@search.facets": {
                "year": [{"value": 2019, "count": 3}, {"value": null, "count": 1}]
            }
        });
        let values = parse_facets(&body, "year").unwrap();
        assert_eq!(values, vec![FacetCount::new("2019", 3)]);
    }

    #[test]
    fn test_parse_facets_missing_field() {
        let body = json!({"@search.facets": {"other": []}, "value": []});
        let err = parse_facets(&body, "symptom").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_facets_no_facets_at_all() {
        let err = parse_facets(&json!({"value": []}), "symptom").unwrap_err();
        assert!(err.is_backend_failure());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_backend_unavailable() {
        let config = SearchConfig {
            endpoint: Some("http://127.0.0.1:1".to_string()),
            api_key: Some("k".to_string()),
            timeout_secs: 2,
            ..Default::default()
        };
        let backend = AzureSearchBackend::new(&config).unwrap();
        let err = backend
            .search(FacetRequest::new("aspirin", "symptom", 15))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable(_)));
    }
}
