//! arXiv search client.
//!
//! Dispatches free-text searches to the public arXiv Atom API, maps the XML
//! feed into [`models::Paper`] records and renders them as result cards.
//!
//! # Features
//!
//! - **Namespace-aware feed mapping**: Atom, arXiv and OpenSearch elements
//! - **Distinguishable failures**: zero results vs. malformed responses
//! - **Stale-result protection**: only the latest search reaches the view
//! - **Markdown and JSON cards** for terminal or machine consumption
//!
//! # Example
//!
//! ```no_run
//! use arxiv_search::{client::ArxivClient, config::Config, models::SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = ArxivClient::new(config)?;
//!
//!     let feed = client.search(&SearchQuery::new("transformer")).await?;
//!     println!("{} papers", feed.papers.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod formatters;
pub mod models;
pub mod session;
pub mod version;

pub use client::{ArxivClient, PaperSource};
pub use config::Config;
pub use error::{ClientError, FeedError, SearchError};
pub use session::{SearchSession, SearchView};
