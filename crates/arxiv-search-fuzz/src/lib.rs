//! Fuzzing library for arxiv-search.
//!
//! This crate provides fuzzing targets for the Atom feed mapper and the
//! search input model.
//!
//! # Usage
//!
//! ```bash
//! cd crates/arxiv-search-fuzz
//! cargo +nightly fuzz run fuzz_feed_parse -- -max_total_time=60
//! ```

pub use arxiv_search::{feed, models};
