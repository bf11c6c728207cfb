//! arXiv API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Optional retry middleware with exponential backoff (off by default)
//! - Query URL construction for the Atom endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use url::Url;

use crate::config::Config;
use crate::error::{ClientError, ClientResult, SearchResult};
use crate::feed;
use crate::models::{Feed, SearchQuery};

/// Anything that can answer a search with a mapped feed.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Run one search.
    async fn search(&self, query: &SearchQuery) -> SearchResult<Feed>;
}

/// arXiv API client.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Query endpoint.
    api_url: Url,

    /// Retry budget (for Debug output).
    max_retries: u32,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint URL is invalid or HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api_url = Url::parse(&config.api_url).map_err(ClientError::InvalidUrl)?;

        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, api_url, max_retries: config.max_retries })
    }

    /// Build the request URL for a query.
    ///
    /// `search_query=all:<query>&start=<n>&max_results=<m>`, with the
    /// trimmed query URL-encoded.
    #[must_use]
    pub fn query_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("search_query", &format!("all:{}", query.trimmed()))
            .append_pair("start", &query.start.to_string())
            .append_pair("max_results", &query.max_results.to_string());
        url
    }

    /// Fetch the raw feed text for a query.
    ///
    /// Issues exactly one request unless retries are configured.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-2xx status.
    pub async fn fetch_feed(&self, query: &SearchQuery) -> ClientResult<String> {
        let url = self.query_url(query);
        tracing::debug!(%url, "Dispatching arXiv query");

        let response = self.client.get(url).send().await?;
        let response = Self::handle_response(response).await?;

        Ok(response.text().await?)
    }

    /// Fetch and map one page of results.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Fetch`] on transport failure and
    /// [`crate::SearchError::Malformed`] when the body is not a readable feed.
    pub async fn search(&self, query: &SearchQuery) -> SearchResult<Feed> {
        let body = self.fetch_feed(query).await?;
        Ok(feed::parse_feed(&body)?)
    }

    /// Turn non-2xx responses into errors.
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "arXiv query failed");
        Err(ClientError::status(status.as_u16(), text))
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn search(&self, query: &SearchQuery) -> SearchResult<Feed> {
        Self::search(self, query).await
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient")
            .field("api_url", &self.api_url.as_str())
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ArxivClient {
        ArxivClient::new(Config::default()).unwrap()
    }

    #[test]
    fn test_query_url_parameters() {
        let url = client().query_url(&SearchQuery::new("transformer").with_start(20));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("export.arxiv.org"));
        assert_eq!(url.path(), "/api/query");
        assert_eq!(
            pairs,
            vec![
                ("search_query".to_string(), "all:transformer".to_string()),
                ("start".to_string(), "20".to_string()),
                ("max_results".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_is_trimmed_and_encoded() {
        let url = client().query_url(&SearchQuery::new("  graph neural & nets "));
        let query = url.query().unwrap();
        assert!(!query.contains(' '));
        assert!(query.contains("%26"));

        let search = url.query_pairs().find(|(k, _)| k == "search_query").unwrap().1;
        assert_eq!(search, "all:graph neural & nets");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let config = Config { api_url: "not a url".to_string(), ..Config::default() };
        let err = ArxivClient::new(config).unwrap_err();
        assert!(matches!(err.downcast_ref::<ClientError>(), Some(ClientError::InvalidUrl(_))));
    }
}
