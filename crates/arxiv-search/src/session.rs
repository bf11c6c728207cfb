//! Search state shared by a front-end.
//!
//! Each dispatched search is tagged with a generation number. A completed
//! search only reaches the view if no newer search has been started since,
//! so a slow response can never overwrite the results of a later query.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use crate::client::PaperSource;
use crate::error::{SearchError, SearchResult};
use crate::models::{Feed, Paper, SearchQuery};

/// Message shown when a finished search matched nothing.
pub const NO_RESULTS_MESSAGE: &str = "No papers found. Try different keywords.";

/// Why a search produced no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Transport failure or non-2xx status.
    Fetch,
    /// The catalog answered with something that is not a readable feed.
    Malformed,
}

/// What a front-end should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SearchView {
    /// Nothing searched yet.
    Idle,
    /// A search is in flight.
    Loading {
        /// Query being searched.
        query: String,
    },
    /// Results arrived.
    Loaded {
        /// Query that produced the results.
        query: String,
        /// Total matches reported by the catalog.
        total_results: Option<u64>,
        /// Papers in document order.
        papers: Vec<Paper>,
    },
    /// The search finished with zero results.
    Empty {
        /// Query that matched nothing.
        query: String,
    },
    /// The search failed.
    Failed {
        /// Query that failed.
        query: String,
        /// Failure category.
        kind: FailureKind,
        /// Message for the user.
        message: String,
    },
}

impl SearchView {
    fn from_outcome(query: String, outcome: SearchResult<Feed>) -> Self {
        match outcome {
            Ok(feed) if feed.is_empty() => Self::Empty { query },
            Ok(feed) => {
                Self::Loaded { query, total_results: feed.total_results, papers: feed.papers }
            }
            Err(err) => {
                let kind = match err {
                    SearchError::Fetch(_) => FailureKind::Fetch,
                    SearchError::Malformed(_) => FailureKind::Malformed,
                    // `begin` rejects bad queries before dispatch; only a
                    // source can report one here.
                    SearchError::Validation { .. } => FailureKind::Fetch,
                };
                Self::Failed { query, kind, message: err.to_user_message() }
            }
        }
    }

    /// Check if a search is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Papers currently displayed.
    #[must_use]
    pub fn papers(&self) -> &[Paper] {
        match self {
            Self::Loaded { papers, .. } => papers.as_slice(),
            _ => &[],
        }
    }

    /// Query the view belongs to, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { query }
            | Self::Loaded { query, .. }
            | Self::Empty { query }
            | Self::Failed { query, .. } => Some(query),
        }
    }
}

/// Proof that a search was started; needed to complete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Generation number of the search.
    pub generation: u64,
    /// The validated query.
    pub query: SearchQuery,
}

/// Search session over a [`PaperSource`].
pub struct SearchSession<S: ?Sized = dyn PaperSource> {
    source: Arc<S>,
    /// Generation of the most recently started search.
    latest: AtomicU64,
    view: RwLock<SearchView>,
}

impl<S: PaperSource + ?Sized> SearchSession<S> {
    /// Create an idle session.
    pub fn new(source: Arc<S>) -> Self {
        Self { source, latest: AtomicU64::new(0), view: RwLock::new(SearchView::Idle) }
    }

    /// Start a search: validate the query and mark the view as loading.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank query; the view is left untouched.
    pub async fn begin(&self, query: SearchQuery) -> SearchResult<SearchTicket> {
        query.validate()?;

        // Bump under the view lock so a racing completion sees a consistent pair.
        let mut view = self.view.write().await;
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        *view = SearchView::Loading { query: query.trimmed().to_string() };
        drop(view);

        tracing::debug!(generation, query = %query.trimmed(), "Search started");
        Ok(SearchTicket { generation, query })
    }

    /// Apply a finished search.
    ///
    /// Returns `false` and leaves the view alone when a newer search has been
    /// started since the ticket was issued.
    pub async fn complete(&self, ticket: SearchTicket, outcome: SearchResult<Feed>) -> bool {
        let mut view = self.view.write().await;

        let latest = self.latest.load(Ordering::SeqCst);
        if ticket.generation != latest {
            tracing::debug!(generation = ticket.generation, latest, "Dropping stale search result");
            return false;
        }

        if let Err(err) = &outcome {
            tracing::warn!(error = %err, "Search failed");
        }
        *view = SearchView::from_outcome(ticket.query.trimmed().to_string(), outcome);
        true
    }

    /// Run a search end to end.
    ///
    /// Returns whether the outcome was applied to the view.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank query. Fetch and mapping
    /// failures are reported through the view instead.
    pub async fn submit(&self, query: SearchQuery) -> SearchResult<bool> {
        let ticket = self.begin(query).await?;
        let outcome = self.source.search(&ticket.query).await;
        Ok(self.complete(ticket, outcome).await)
    }

    /// Snapshot of the current view.
    pub async fn view(&self) -> SearchView {
        self.view.read().await.clone()
    }

    /// Generation of the most recently started search.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

impl<S: ?Sized> std::fmt::Debug for SearchSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("latest", &self.latest.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, FeedError};

    fn paper(id: &str) -> Paper {
        Paper { id: id.to_string(), ..Default::default() }
    }

    #[test]
    fn test_view_from_empty_feed() {
        let view = SearchView::from_outcome("q".to_string(), Ok(Feed::default()));
        assert_eq!(view, SearchView::Empty { query: "q".to_string() });
    }

    #[test]
    fn test_view_from_papers() {
        let feed = Feed { papers: vec![paper("a"), paper("b")], ..Default::default() };
        let view = SearchView::from_outcome("q".to_string(), Ok(feed));
        assert_eq!(view.papers().len(), 2);
        assert_eq!(view.query(), Some("q"));
    }

    #[test]
    fn test_view_failure_kinds() {
        let fetch = SearchView::from_outcome(
            "q".to_string(),
            Err(ClientError::status(502, "bad gateway").into()),
        );
        let malformed =
            SearchView::from_outcome("q".to_string(), Err(FeedError::MissingFeed.into()));

        assert!(matches!(fetch, SearchView::Failed { kind: FailureKind::Fetch, .. }));
        assert!(matches!(malformed, SearchView::Failed { kind: FailureKind::Malformed, .. }));
    }

    #[test]
    fn test_view_serializes_with_state_tag() {
        let json = serde_json::to_value(SearchView::Empty { query: "q".to_string() }).unwrap();
        assert_eq!(json["state"], "empty");
        assert_eq!(json["query"], "q");
    }
}
