//! Expansion limits and scheduling settings.

use std::time::Duration;

use facetweb_search::MATCH_ALL;
use serde::{Deserialize, Serialize};

/// Configuration for a [`GraphBuilder`](crate::GraphBuilder).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Facet values fetched for the root term.
    pub level2_max_facets: usize,
    /// Facet values fetched for each level-2 term.
    pub level3_max_facets_per_branch: usize,
    /// Level-3 queries allowed in flight at once.
    pub concurrency: usize,
    /// Query substituted for a blank root term.
    pub match_all: String,
    /// Abandon expansion after this many milliseconds.
    pub deadline_ms: Option<u64>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            level2_max_facets: 15,
            level3_max_facets_per_branch: 3,
            concurrency: 1,
            match_all: MATCH_ALL.to_string(),
            deadline_ms: None,
        }
    }
}

impl ExpansionConfig {
    /// Set the level-3 fan-out.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set an overall deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// The overall deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Fan-out actually used; zero is treated as sequential.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExpansionConfig::default();
        assert_eq!(config.level2_max_facets, 15);
        assert_eq!(config.level3_max_facets_per_branch, 3);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.match_all, "*");
        assert!(config.deadline().is_none());
    }

    #[test]
    fn test_builders() {
        let config = ExpansionConfig::default()
            .with_concurrency(4)
            .with_deadline(Duration::from_millis(250));
        assert_eq!(config.effective_concurrency(), 4);
        assert_eq!(config.deadline(), Some(Duration::from_millis(250)));
        assert_eq!(config.deadline_ms, Some(250));
    }

    #[test]
    fn test_zero_concurrency_is_sequential() {
        let config = ExpansionConfig::default().with_concurrency(0);
        assert_eq!(config.effective_concurrency(), 1);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ExpansionConfig = serde_json::from_str(r#"{"concurrency": 8}"#).unwrap();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.level2_max_facets, 15);
    }
}
