#![no_main]

use arxiv_search::models::SearchQuery;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Deserialize then validate; neither step may panic
    if let Ok(query) = serde_json::from_slice::<SearchQuery>(data) {
        let _ = query.validate();
    }
});
