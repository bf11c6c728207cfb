//! Live tests against the public arXiv API.
//!
//! Run with: `cargo test --features integration -- --nocapture`

#![cfg(feature = "integration")]

use arxiv_search::client::ArxivClient;
use arxiv_search::config::Config;
use arxiv_search::models::SearchQuery;

fn create_client() -> ArxivClient {
    ArxivClient::new(Config::default()).expect("Failed to create client")
}

#[tokio::test]
async fn test_search_transformer() {
    let client = create_client();
    let feed = client
        .search(&SearchQuery::new("attention is all you need").with_max_results(5))
        .await
        .expect("search should succeed");

    assert!(!feed.papers.is_empty());
    assert!(feed.total_results.unwrap_or(0) > 0);

    let paper = &feed.papers[0];
    assert!(paper.id.contains("arxiv.org/abs/"));
    assert!(!paper.title.is_empty());
    assert!(!paper.authors.is_empty());
    assert!(!paper.primary_category.is_empty());
}

#[tokio::test]
async fn test_search_pagination() {
    let client = create_client();
    let feed = client
        .search(&SearchQuery::new("graph").with_start(10).with_max_results(3))
        .await
        .expect("search should succeed");

    assert_eq!(feed.start_index, Some(10));
    assert!(feed.papers.len() <= 3);
}
