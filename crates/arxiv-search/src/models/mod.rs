//! Data models for arXiv search.
//!
//! Optional fields are skipped when serializing so that absent values never
//! show up as empty strings.

mod enums;
mod inputs;
mod paper;

pub use enums::ResponseFormat;
pub use inputs::SearchQuery;
pub use paper::{Feed, Paper};
