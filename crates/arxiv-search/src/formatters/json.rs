//! Compact JSON output.

use serde_json::{Value, json};

use crate::models::Paper;
use crate::session::SearchView;

/// Create a compact paper representation for JSON output.
///
/// Empty strings and lists are left out; `link` is always present. Keys
/// follow the snake_case of the [`Paper`] serde form.
#[must_use]
pub fn compact_paper(paper: &Paper) -> Value {
    let mut obj = json!({
        "id": paper.id,
        "title": paper.title,
        "link": paper.link_url(),
    });

    if let Some(arxiv_id) = paper.arxiv_id() {
        obj["arxiv_id"] = json!(arxiv_id);
    }

    if !paper.authors.is_empty() {
        obj["authors"] = json!(paper.authors);
    }

    if !paper.published.is_empty() {
        obj["published"] = json!(paper.published);
    }

    if !paper.primary_category.is_empty() {
        obj["primary_category"] = json!(paper.primary_category);
    }

    if !paper.categories.is_empty() {
        obj["categories"] = json!(paper.categories);
    }

    if let Some(pdf) = paper.pdf_link() {
        obj["pdf"] = json!(pdf);
    }

    if let Some(doi) = &paper.doi {
        obj["doi"] = json!(doi);
    }

    if let Some(journal_ref) = &paper.journal_ref {
        obj["journal_ref"] = json!(journal_ref);
    }

    if !paper.r#abstract.is_empty() {
        obj["abstract"] = json!(paper.r#abstract);
    }

    obj
}

/// JSON form of the session view.
#[must_use]
pub fn view_json(view: &SearchView) -> Value {
    match view {
        SearchView::Loaded { query, total_results, papers } => json!({
            "state": "loaded",
            "query": query,
            "total_results": total_results,
            "papers": papers.iter().map(compact_paper).collect::<Vec<_>>(),
        }),
        other => serde_json::to_value(other).unwrap_or(Value::Null),
    }
}
