#![no_main]

use arxiv_search::feed::{parse_feed, parse_papers_lossy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bodies must map to Ok or Err, never panic
    if let Ok(body) = std::str::from_utf8(data) {
        let strict = parse_feed(body).map(|feed| feed.papers.len());
        let lossy = parse_papers_lossy(body).len();
        assert_eq!(strict.unwrap_or(0), lossy);
    }
});
