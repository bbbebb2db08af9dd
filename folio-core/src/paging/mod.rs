//! Page segmentation and metadata hoisting
//!
//!     [`paginate`] turns one parsed document into a [`PageCollection`]:
//!
//!     1. scan the tree once for front-matter blocks, directives and section boundaries
//!     2. walk the scanned nodes in document order: front-matter feeds the global metadata, a
//!        boundary opens a page, a directive feeds the metadata of the page opened last
//!     3. remove every metadata node from (a copy of) the tree, last one first
//!     4. give each page the content between its boundary and the next one
//!
//!     A document without boundaries is a single page holding the whole pruned tree.
//!
//!     Content before the first boundary is not dropped: it is carried into the first page.
//!
//!     Metadata is kept as ordered string maps. Global and page metadata are only combined at
//!     render time, through [`merge_metadata`].

mod directive;
mod prune;
mod segment;

pub use directive::parse_directive;
pub use prune::prune;
pub use segment::paginate;

use crate::ast::Node;
use crate::error::FrontmatterError;
use crate::matcher::Matcher;
use crate::scanning::ScanRules;
use std::collections::BTreeMap;

pub type Metadata = BTreeMap<String, String>;

/// Default heading depth at or above which a heading opens a page.
pub const DEFAULT_MAX_DEPTH: u64 = 2;

/// Turns the raw payload of a front-matter block into key/value pairs.
pub trait FrontmatterParser {
    fn parse(&self, raw: &str) -> Result<Metadata, FrontmatterError>;
}

impl<F> FrontmatterParser for F
where
    F: Fn(&str) -> Result<Metadata, FrontmatterError>,
{
    fn parse(&self, raw: &str) -> Result<Metadata, FrontmatterError> {
        self(raw)
    }
}

#[derive(Debug, Clone)]
pub struct PagingOptions {
    pub rules: ScanRules,
}

impl PagingOptions {
    pub fn with_boundary(mut self, boundary: Matcher) -> Self {
        self.rules.boundary = boundary;
        self
    }

    /// Headings of depth `1..=max_depth` open pages.
    pub fn with_max_depth(self, max_depth: u64) -> Self {
        self.with_boundary(Matcher::heading_up_to(max_depth))
    }

    pub fn with_directive(mut self, directive: Matcher) -> Self {
        self.rules.directive = directive;
        self
    }

    pub fn with_frontmatter(mut self, frontmatter: Matcher) -> Self {
        self.rules.frontmatter = frontmatter;
        self
    }
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self {
            rules: ScanRules {
                frontmatter: Matcher::kind("yaml"),
                directive: Matcher::any_of([
                    Matcher::kind("leafDirective"),
                    Matcher::kind("textDirective"),
                ]),
                boundary: Matcher::heading_up_to(DEFAULT_MAX_DEPTH),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// The boundary node that opened the page. `None` only for the single page of a document
    /// without boundaries.
    pub heading: Option<Node>,
    /// A `root` node holding the page's content, metadata nodes removed.
    pub content: Node,
    pub metadata: Metadata,
}

impl PageRecord {
    /// Plain text of the heading, if the page has one.
    pub fn title(&self) -> Option<String> {
        self.heading.as_ref().map(Node::text_content)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageCollection {
    pub global_metadata: Metadata,
    pub pages: Vec<PageRecord>,
}

impl PageCollection {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.pages.iter()
    }

    /// Global metadata overlaid with the page's own.
    pub fn effective_metadata(&self, index: usize) -> Option<Metadata> {
        self.pages
            .get(index)
            .map(|page| merge_metadata(&self.global_metadata, &page.metadata))
    }
}

/// `global` overlaid with `page`: on a shared key the page value wins.
pub fn merge_metadata(global: &Metadata, page: &Metadata) -> Metadata {
    let mut merged = global.clone();
    merged.extend(page.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_page_wins() {
        let global = meta(&[("title", "Global"), ("author", "Ann")]);
        let page = meta(&[("title", "Page"), ("mood", "calm")]);
        assert_eq!(
            merge_metadata(&global, &page),
            meta(&[("title", "Page"), ("author", "Ann"), ("mood", "calm")])
        );
    }

    #[test]
    fn test_merge_with_empty_sides() {
        let global = meta(&[("title", "Global")]);
        assert_eq!(merge_metadata(&global, &Metadata::new()), global);
        assert_eq!(merge_metadata(&Metadata::new(), &global), global);
    }

    #[test]
    fn test_closure_frontmatter_parser() {
        let parser = |raw: &str| -> Result<Metadata, FrontmatterError> {
            Ok(meta(&[("raw", raw)]))
        };
        assert_eq!(parser.parse("x").unwrap(), meta(&[("raw", "x")]));
    }
}
