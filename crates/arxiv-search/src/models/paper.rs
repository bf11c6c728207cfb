//! Paper record mapped from an arXiv Atom entry.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A research paper from the arXiv catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// arXiv abstract URL (e.g., `http://arxiv.org/abs/1706.03762v7`).
    pub id: String,

    /// Paper title.
    pub title: String,

    /// Author names in document order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Paper abstract.
    #[serde(default)]
    pub r#abstract: String,

    /// First version timestamp (ISO 8601).
    #[serde(default)]
    pub published: String,

    /// Latest version timestamp (ISO 8601).
    #[serde(default)]
    pub updated: String,

    /// PDF download URL, empty when the entry has none.
    #[serde(default)]
    pub pdf_url: String,

    /// Primary subject category (e.g., "cs.CL"), empty when absent.
    #[serde(default)]
    pub primary_category: String,

    /// All subject categories in document order.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Digital Object Identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// Author comment (page counts, venue notes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Journal reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_ref: Option<String>,
}

impl Paper {
    /// Outbound link: the DOI resolver when a DOI is known, otherwise the arXiv id URL.
    #[must_use]
    pub fn link_url(&self) -> String {
        match self.doi.as_deref().map(str::trim) {
            Some(doi) if !doi.is_empty() => format!("https://doi.org/{doi}"),
            _ => self.id.clone(),
        }
    }

    /// PDF link, if the entry carried one.
    #[must_use]
    pub fn pdf_link(&self) -> Option<&str> {
        (!self.pdf_url.is_empty()).then_some(self.pdf_url.as_str())
    }

    /// Bare arXiv identifier taken from the id URL (e.g., `1706.03762v7`).
    #[must_use]
    pub fn arxiv_id(&self) -> Option<&str> {
        let start = self.id.rfind("/abs/")? + "/abs/".len();
        let id = self.id[start..].trim_matches('/');
        (!id.is_empty()).then_some(id)
    }

    /// Get author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }

    /// Calendar date of first publication, when the timestamp is RFC 3339.
    #[must_use]
    pub fn published_date(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(self.published.trim()).ok().map(|dt| dt.date_naive())
    }

    /// The first `n` categories.
    #[must_use]
    pub fn top_categories(&self, n: usize) -> &[String] {
        &self.categories[..n.min(self.categories.len())]
    }
}

/// One mapped page of an arXiv feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    /// Total matches reported by the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,

    /// Offset of the first paper in this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,

    /// Page size the catalog applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u64>,

    /// Papers in document order.
    #[serde(default)]
    pub papers: Vec<Paper>,
}

impl Feed {
    /// Check if the page has no papers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}
