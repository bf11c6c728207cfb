//! Search request parameters.

use serde::{Deserialize, Serialize};

use crate::config::api;
use crate::error::{SearchError, SearchResult};

/// A single page of a free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Free-text query (e.g., "transformer attention").
    pub query: String,

    /// Zero-based offset of the first result.
    #[serde(default)]
    pub start: u32,

    /// Page size.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_max_results() -> u32 {
    api::DEFAULT_MAX_RESULTS
}

impl SearchQuery {
    /// First page of results for `query`.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), start: 0, max_results: default_max_results() }
    }

    /// Set the start offset.
    #[must_use]
    pub const fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// The query with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.query.trim()
    }

    /// Check the query before it is dispatched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank query or an out-of-range page size.
    pub fn validate(&self) -> SearchResult<()> {
        if self.trimmed().is_empty() {
            return Err(SearchError::validation("query", "cannot be empty"));
        }
        if self.max_results == 0 || self.max_results > api::MAX_RESULTS_LIMIT {
            return Err(SearchError::validation(
                "max_results",
                format!("must be between 1 and {}", api::MAX_RESULTS_LIMIT),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = SearchQuery::new("transformer");
        assert_eq!(query.start, 0);
        assert_eq!(query.max_results, 10);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_blank_query_rejected() {
        let err = SearchQuery::new("   \n\t").validate().unwrap_err();
        assert!(matches!(err, SearchError::Validation { ref field, .. } if field == "query"));
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(SearchQuery::new("q").with_max_results(0).validate().is_err());
        assert!(SearchQuery::new("q").with_max_results(2000).validate().is_ok());
        assert!(SearchQuery::new("q").with_max_results(2001).validate().is_err());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let query: SearchQuery = serde_json::from_str(r#"{"query": "graphs"}"#).unwrap();
        assert_eq!(query, SearchQuery::new("graphs"));
    }
}
