//! Markdown result cards.

use std::borrow::Cow;

use crate::models::Paper;
use crate::session::{NO_RESULTS_MESSAGE, SearchView};

/// Abstracts longer than this are clamped on the card.
const ABSTRACT_PREVIEW_CHARS: usize = 300;

/// Categories shown as tags on a card.
const CARD_TAGS: usize = 3;

/// Format a list of papers as Markdown cards.
#[must_use]
pub fn format_papers_markdown(papers: &[Paper]) -> String {
    if papers.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut output = format!("# Papers ({} results)\n\n", papers.len());

    for (i, paper) in papers.iter().enumerate() {
        output.push_str(&format_paper_markdown(paper, i + 1));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single paper as a Markdown card.
#[must_use]
pub fn format_paper_markdown(paper: &Paper, index: usize) -> String {
    let mut output = String::new();

    // Title, linked to the DOI or the abstract page
    let title = if paper.title.is_empty() { "Untitled" } else { paper.title.as_str() };
    output.push_str(&format!(
        "## {}. [{}](<{}>)\n\n",
        index,
        escape_link_text(title),
        paper.link_url()
    ));

    if !paper.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", paper.author_names()));
    }

    let mut meta = vec![format!("**Published**: {}", format_published(paper))];
    if !paper.primary_category.is_empty() {
        meta.push(format!("**Category**: {}", paper.primary_category));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    if !paper.r#abstract.is_empty() {
        output.push_str(&format!("{}\n\n", clamp_abstract(&paper.r#abstract)));
    }

    let tags: Vec<String> = paper
        .top_categories(CARD_TAGS)
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| format!("`{c}`"))
        .collect();
    if !tags.is_empty() {
        output.push_str(&format!("**Tags**: {}\n\n", tags.join(" ")));
    }

    if let Some(journal_ref) = &paper.journal_ref {
        output.push_str(&format!("**Journal**: {journal_ref}\n\n"));
    }

    if let Some(pdf) = paper.pdf_link() {
        output.push_str(&format!("**PDF**: [Download PDF](<{pdf}>)\n"));
    }

    output
}

/// Publication date as `Month D, YYYY`, or the raw timestamp if it does not parse.
#[must_use]
pub fn format_published(paper: &Paper) -> String {
    paper
        .published_date()
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| paper.published.clone())
}

/// Escape characters that would end the link text early.
fn escape_link_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '[', ']']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

fn clamp_abstract(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(ABSTRACT_PREVIEW_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}...", text[..cut].trim_end())),
        None => Cow::Borrowed(text),
    }
}

/// Format the session view as Markdown.
#[must_use]
pub fn format_view_markdown(view: &SearchView) -> String {
    match view {
        SearchView::Idle => "Enter keywords, paper title, or author name to search.".to_string(),
        SearchView::Loading { query } => format!("Searching arXiv for \"{query}\"..."),
        SearchView::Loaded { papers, .. } => format_papers_markdown(papers),
        SearchView::Empty { .. } => NO_RESULTS_MESSAGE.to_string(),
        SearchView::Failed { message, .. } => format!("> **Error**: {message}"),
    }
}
