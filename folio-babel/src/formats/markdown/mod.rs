//! Markdown format implementation
//!
//! Data Model:
//!
//!     Parsing produces an mdast-shaped tree, plus the two extensions folio relies on:
//!
//!     | Markdown                    | Node                                     |
//!     |-----------------------------|------------------------------------------|
//!     | `---` front-matter          | `yaml { value }` (delimiters stripped)   |
//!     | `::name[label]{k=v}` alone  | `leafDirective { name, attributes? }`    |
//!     |   on a paragraph            |   with the label as `text` children      |
//!     | `:name[label]` in a line    | `textDirective { name }`                 |
//!     | `# Title`                   | `heading { depth }`                      |
//!     | fenced / indented code      | `code { lang?, meta?, value }`           |
//!     | lists                       | `list { ordered, start?, spread }`       |
//!
//!     Everything else follows mdast naming (`paragraph`, `emphasis`, `strong`, `inlineCode`,
//!     `link`, `image`, `blockquote`, `thematicBreak`, `break`, `html`, `delete`).
//!
//! Library
//!
//!     Parsing uses the comrak crate. Directives are not CommonMark, so they are recognized on
//!     comrak's output: a paragraph whose whole text is a `::name[...]` line becomes a leaf
//!     directive, and `:name[...]` runs inside text become text directives.
//!
//!     Serialization is a direct tree walk (see serializer.rs). comrak's own CommonMark writer
//!     works on its arena AST and escapes more punctuation than the pages need.

mod directives;
mod escape;
mod parser;
mod serializer;

pub use escape::{calculate_fence_length, calculate_inline_code_ticks, escape_markdown};
pub use parser::parse_from_markdown;
pub use serializer::serialize_to_markdown;

use crate::error::FormatError;
use crate::format::{Capabilities, Format};
use folio_core::Node;

/// CommonMark with front-matter and directives
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark with YAML front-matter and directives"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BOTH
    }

    fn parse(&self, source: &str) -> Result<Node, FormatError> {
        parse_from_markdown(source)
    }

    fn serialize(&self, node: &Node) -> Result<String, FormatError> {
        serialize_to_markdown(node)
    }
}
