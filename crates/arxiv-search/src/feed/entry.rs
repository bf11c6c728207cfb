//! Accumulates one `entry` element into a [`Paper`].

use crate::models::Paper;

/// Text-bearing children of an `entry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Field {
    Id,
    Title,
    Summary,
    Published,
    Updated,
    Doi,
    Comment,
    JournalRef,
}

/// Fields collected so far. The first occurrence of each node wins.
#[derive(Debug, Default)]
pub(super) struct EntryBuilder {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    updated: Option<String>,
    doi: Option<String>,
    comment: Option<String>,
    journal_ref: Option<String>,
    authors: Vec<String>,
    current_author: Option<Option<String>>,
    pdf_url: Option<String>,
    primary_category: Option<String>,
    categories: Vec<String>,
}

impl EntryBuilder {
    pub(super) fn set_field(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Id => &mut self.id,
            Field::Title => &mut self.title,
            Field::Summary => &mut self.summary,
            Field::Published => &mut self.published,
            Field::Updated => &mut self.updated,
            Field::Doi => &mut self.doi,
            Field::Comment => &mut self.comment,
            Field::JournalRef => &mut self.journal_ref,
        };
        slot.get_or_insert(text);
    }

    pub(super) fn begin_author(&mut self) {
        self.current_author = Some(None);
    }

    pub(super) fn author_name(&mut self, name: String) {
        if let Some(slot) = self.current_author.as_mut() {
            slot.get_or_insert(name);
        }
    }

    /// An `author` without a `name` still counts, as an empty string.
    pub(super) fn finish_author(&mut self) {
        if let Some(name) = self.current_author.take() {
            self.authors.push(name.map(|n| n.trim().to_string()).unwrap_or_default());
        }
    }

    pub(super) fn pdf_link(&mut self, href: String) {
        self.pdf_url.get_or_insert(href);
    }

    pub(super) fn primary_category(&mut self, term: String) {
        self.primary_category.get_or_insert(term);
    }

    pub(super) fn category(&mut self, term: String) {
        self.categories.push(term);
    }

    /// The raw `id` text, used to spot arXiv error entries.
    pub(super) fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default().trim()
    }

    /// The raw `summary` text.
    pub(super) fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or_default().trim()
    }

    pub(super) fn build(self) -> Paper {
        Paper {
            id: trimmed(self.id),
            title: collapsed(self.title),
            authors: self.authors,
            r#abstract: collapsed(self.summary),
            published: trimmed(self.published),
            updated: trimmed(self.updated),
            pdf_url: self.pdf_url.unwrap_or_default(),
            primary_category: self.primary_category.unwrap_or_default(),
            categories: self.categories,
            doi: self.doi.map(|s| s.trim().to_string()),
            comment: self.comment.map(|s| s.trim().to_string()),
            journal_ref: self.journal_ref.map(|s| s.trim().to_string()),
        }
    }
}

fn trimmed(text: Option<String>) -> String {
    text.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// arXiv hard-wraps titles and abstracts; runs of whitespace become one space.
fn collapsed(text: Option<String>) -> String {
    text.map(|s| s.split_whitespace().collect::<Vec<_>>().join(" ")).unwrap_or_default()
}
