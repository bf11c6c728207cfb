//! Output formatters for Markdown and JSON.

mod json;
mod markdown;

pub use self::json::*;
pub use markdown::*;

use crate::models::ResponseFormat;
use crate::session::SearchView;

/// Render the session view in the requested format.
#[must_use]
pub fn render_view(view: &SearchView, format: ResponseFormat) -> String {
    match format {
        ResponseFormat::Markdown => format_view_markdown(view),
        ResponseFormat::Json => view_json(view).to_string(),
    }
}
