//! Maps an arXiv Atom feed into [`Paper`] records.
//!
//! Every `entry` becomes one record, in document order. Missing optional
//! nodes fall back to empty values; only a document that cannot be read as
//! a feed at all is an error.

mod entry;

use std::mem;

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use self::entry::{EntryBuilder, Field};
use crate::config::namespaces;
use crate::error::{FeedError, FeedResult};
use crate::models::{Feed, Paper};

/// arXiv reports query errors as an entry whose id lives under this path.
const API_ERROR_ID: &str = "arxiv.org/api/errors";

/// Namespace an element resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ns {
    Atom,
    Arxiv,
    OpenSearch,
    Other,
}

impl Ns {
    /// Unqualified elements are read as Atom; undeclared `arxiv:` and
    /// `opensearch:` prefixes are accepted by name.
    fn of(resolved: &ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Unbound => Self::Atom,
            ResolveResult::Bound(ns) => match ns.as_ref() {
                namespaces::ATOM => Self::Atom,
                namespaces::ARXIV => Self::Arxiv,
                namespaces::OPENSEARCH => Self::OpenSearch,
                _ => Self::Other,
            },
            ResolveResult::Unknown(prefix) => match prefix.as_slice() {
                b"arxiv" => Self::Arxiv,
                b"opensearch" => Self::OpenSearch,
                _ => Self::Other,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    TotalResults,
    StartIndex,
    ItemsPerPage,
}

/// Element kinds the mapper cares about, by position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Feed,
    Entry,
    Field(Field),
    Author,
    AuthorName,
    Counter(Counter),
    Link,
    Category,
    PrimaryCategory,
    Other,
}

impl Node {
    fn classify(ns: Ns, local: &[u8], parent: Option<Self>) -> Self {
        match (parent, ns, local) {
            (None, Ns::Atom, b"feed") => Self::Feed,

            (Some(Self::Feed), Ns::Atom, b"entry") => Self::Entry,
            (Some(Self::Feed), Ns::OpenSearch, b"totalResults") => {
                Self::Counter(Counter::TotalResults)
            }
            (Some(Self::Feed), Ns::OpenSearch, b"startIndex") => Self::Counter(Counter::StartIndex),
            (Some(Self::Feed), Ns::OpenSearch, b"itemsPerPage") => {
                Self::Counter(Counter::ItemsPerPage)
            }

            (Some(Self::Entry), Ns::Atom, b"id") => Self::Field(Field::Id),
            (Some(Self::Entry), Ns::Atom, b"title") => Self::Field(Field::Title),
            (Some(Self::Entry), Ns::Atom, b"summary") => Self::Field(Field::Summary),
            (Some(Self::Entry), Ns::Atom, b"published") => Self::Field(Field::Published),
            (Some(Self::Entry), Ns::Atom, b"updated") => Self::Field(Field::Updated),
            (Some(Self::Entry), Ns::Atom, b"author") => Self::Author,
            (Some(Self::Entry), Ns::Atom, b"link") => Self::Link,
            (Some(Self::Entry), Ns::Atom, b"category") => Self::Category,
            (Some(Self::Entry), Ns::Arxiv, b"primary_category") => Self::PrimaryCategory,
            (Some(Self::Entry), Ns::Arxiv, b"doi") => Self::Field(Field::Doi),
            (Some(Self::Entry), Ns::Arxiv, b"comment") => Self::Field(Field::Comment),
            (Some(Self::Entry), Ns::Arxiv, b"journal_ref") => Self::Field(Field::JournalRef),

            (Some(Self::Author), Ns::Atom, b"name") => Self::AuthorName,

            _ => Self::Other,
        }
    }

    const fn captures_text(self) -> bool {
        matches!(self, Self::Field(_) | Self::AuthorName | Self::Counter(_))
    }
}

/// Mapper state while walking the document.
#[derive(Default)]
struct FeedBuilder {
    stack: Vec<Node>,
    seen_root: bool,
    seen_feed: bool,
    feed: Feed,
    entry: Option<EntryBuilder>,
    text: String,
}

impl FeedBuilder {
    fn parent(&self) -> Option<Node> {
        self.stack.last().copied()
    }

    /// A well-formed document has exactly one top-level element.
    fn enter(&mut self) -> FeedResult<()> {
        if self.stack.is_empty() {
            if self.seen_root {
                return Err(FeedError::MultipleRoots);
            }
            self.seen_root = true;
        }
        Ok(())
    }

    /// Text belongs to the nearest enclosing element the mapper knows.
    fn capturing(&self) -> bool {
        self.stack.iter().rev().find(|n| **n != Node::Other).is_some_and(|n| n.captures_text())
    }

    fn open(&mut self, node: Node, element: &BytesStart<'_>) -> FeedResult<()> {
        match node {
            Node::Feed => self.seen_feed = true,
            Node::Entry => self.entry = Some(EntryBuilder::default()),
            Node::Author => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.begin_author();
                }
            }
            Node::Link => {
                if attr(element, b"title")?.as_deref() == Some("pdf") {
                    if let (Some(entry), Some(href)) = (self.entry.as_mut(), attr(element, b"href")?) {
                        entry.pdf_link(href);
                    }
                }
            }
            Node::Category => {
                let term = attr(element, b"term")?.unwrap_or_default();
                if let Some(entry) = self.entry.as_mut() {
                    entry.category(term);
                }
            }
            Node::PrimaryCategory => {
                let term = attr(element, b"term")?.unwrap_or_default();
                if let Some(entry) = self.entry.as_mut() {
                    entry.primary_category(term);
                }
            }
            Node::Field(_) | Node::AuthorName | Node::Counter(_) => self.text.clear(),
            Node::Other => {}
        }
        Ok(())
    }

    fn close(&mut self, node: Node) -> FeedResult<()> {
        match node {
            Node::Field(field) => {
                let text = mem::take(&mut self.text);
                if let Some(entry) = self.entry.as_mut() {
                    entry.set_field(field, text);
                }
            }
            Node::AuthorName => {
                let text = mem::take(&mut self.text);
                if let Some(entry) = self.entry.as_mut() {
                    entry.author_name(text);
                }
            }
            Node::Author => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.finish_author();
                }
            }
            Node::Counter(counter) => {
                let value = mem::take(&mut self.text).trim().parse::<u64>().ok();
                match counter {
                    Counter::TotalResults => self.feed.total_results = value,
                    Counter::StartIndex => self.feed.start_index = value,
                    Counter::ItemsPerPage => self.feed.items_per_page = value,
                }
            }
            Node::Entry => {
                if let Some(entry) = self.entry.take() {
                    if entry.id().contains(API_ERROR_ID) {
                        return Err(FeedError::Api { message: entry.summary().to_string() });
                    }
                    self.feed.papers.push(entry.build());
                }
            }
            Node::Feed | Node::Link | Node::Category | Node::PrimaryCategory | Node::Other => {}
        }
        Ok(())
    }

    fn finish(self) -> FeedResult<Feed> {
        if !self.stack.is_empty() {
            return Err(FeedError::Truncated { open: self.stack.len() });
        }
        if !self.seen_feed {
            return Err(FeedError::MissingFeed);
        }
        Ok(self.feed)
    }
}

/// Value of the attribute with the given local name.
fn attr(element: &BytesStart<'_>, key: &[u8]) -> FeedResult<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.local_name().as_ref() == key {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse an arXiv Atom document.
///
/// A feed without entries is `Ok` with no papers; a document that is not
/// well-formed, has no `feed` root or more than one root, ends early, or carries an arXiv error
/// entry is an `Err`.
///
/// # Errors
///
/// Returns [`FeedError`] when the document cannot be read as a feed.
pub fn parse_feed(xml: &str) -> FeedResult<Feed> {
    let mut reader = NsReader::from_str(xml);
    let mut builder = FeedBuilder::default();

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let ns = Ns::of(&resolved);

        match event {
            Event::Start(element) => {
                builder.enter()?;
                let node = Node::classify(ns, element.local_name().as_ref(), builder.parent());
                builder.open(node, &element)?;
                builder.stack.push(node);
            }
            Event::Empty(element) => {
                builder.enter()?;
                let node = Node::classify(ns, element.local_name().as_ref(), builder.parent());
                builder.open(node, &element)?;
                builder.close(node)?;
            }
            Event::End(_) => {
                if let Some(node) = builder.stack.pop() {
                    builder.close(node)?;
                }
            }
            Event::Text(text) => {
                if builder.capturing() {
                    builder.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if builder.capturing() {
                    builder.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let feed = builder.finish()?;
    tracing::debug!(
        papers = feed.papers.len(),
        total_results = ?feed.total_results,
        "Mapped arXiv feed"
    );
    Ok(feed)
}

/// Parse a feed, collapsing any failure into an empty list.
///
/// Zero results and an unreadable response look the same to the caller;
/// use [`parse_feed`] to tell them apart.
#[must_use]
pub fn parse_papers_lossy(xml: &str) -> Vec<Paper> {
    match parse_feed(xml) {
        Ok(feed) => feed.papers,
        Err(err) => {
            tracing::warn!(error = %err, "Discarding unreadable arXiv response");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_OPEN: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">"#;

    fn feed(body: &str) -> String {
        format!("{FEED_OPEN}{body}</feed>")
    }

    #[test]
    fn test_empty_feed_is_ok() {
        let parsed = parse_feed(&feed("<title>query</title>")).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_self_closing_feed_is_ok() {
        let parsed = parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_feed_level_title_not_taken_as_entry_title() {
        let parsed = parse_feed(&feed("<title>ArXiv Query</title><entry><id>x</id></entry>")).unwrap();
        assert_eq!(parsed.papers[0].title, "");
        assert_eq!(parsed.papers[0].id, "x");
    }

    #[test]
    fn test_counters() {
        let parsed = parse_feed(&feed(
            "<opensearch:totalResults>1234</opensearch:totalResults>\
             <opensearch:startIndex>10</opensearch:startIndex>\
             <opensearch:itemsPerPage>5</opensearch:itemsPerPage>",
        ))
        .unwrap();
        assert_eq!(parsed.total_results, Some(1234));
        assert_eq!(parsed.start_index, Some(10));
        assert_eq!(parsed.items_per_page, Some(5));
    }

    #[test]
    fn test_link_in_start_end_form() {
        let parsed = parse_feed(&feed(
            r#"<entry><link title="pdf" href="http://arxiv.org/pdf/1"></link></entry>"#,
        ))
        .unwrap();
        assert_eq!(parsed.papers[0].pdf_url, "http://arxiv.org/pdf/1");
    }

    #[test]
    fn test_entities_and_cdata_in_text() {
        let parsed = parse_feed(&feed(
            "<entry><title>Q&amp;A <![CDATA[<systems>]]></title></entry>",
        ))
        .unwrap();
        assert_eq!(parsed.papers[0].title, "Q&A <systems>");
    }

    #[test]
    fn test_empty_optional_element_is_present() {
        let parsed = parse_feed(&feed("<entry><arxiv:comment/></entry>")).unwrap();
        assert_eq!(parsed.papers[0].comment.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(parse_feed(""), Err(FeedError::MissingFeed)));
        assert!(matches!(parse_feed("not xml at all"), Err(FeedError::MissingFeed)));
        assert!(matches!(parse_feed("<html><body/></html>"), Err(FeedError::MissingFeed)));
    }

    #[test]
    fn test_second_root_rejected() {
        let twice =
            format!("{}{}", feed("<entry><id>a</id></entry>"), feed("<entry><id>b</id></entry>"));
        assert!(matches!(parse_feed(&twice), Err(FeedError::MultipleRoots)));
        let after_html = format!("<html/>{}", feed(""));
        assert!(matches!(parse_feed(&after_html), Err(FeedError::MultipleRoots)));
    }

    #[test]
    fn test_mismatched_tags() {
        let err = parse_feed(&feed("<entry><title>x</summary></entry>")).unwrap_err();
        assert!(matches!(err, FeedError::Xml(_)));
    }

    #[test]
    fn test_truncated_document() {
        let err = parse_feed(&format!("{FEED_OPEN}<entry><title>x</title>")).unwrap_err();
        assert!(matches!(err, FeedError::Truncated { .. } | FeedError::Xml(_)));
    }

    #[test]
    fn test_api_error_entry() {
        let err = parse_feed(&feed(
            "<entry><id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>\
             <title>Error</title><summary>incorrect id format for 1234</summary></entry>",
        ))
        .unwrap_err();
        match err {
            FeedError::Api { message } => assert_eq!(message, "incorrect id format for 1234"),
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_lossy_collapses_errors() {
        assert!(parse_papers_lossy("<<<").is_empty());
        assert_eq!(parse_papers_lossy(&feed("<entry/><entry/>")).len(), 2);
    }
}
