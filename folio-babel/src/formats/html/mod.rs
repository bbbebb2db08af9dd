//! HTML format implementation
//!
//! Strategy: direct tree → HTML generation (one-way only)
//!
//! # Data Model
//!
//! | Node            | HTML Element                       | Notes                               |
//! |-----------------|------------------------------------|-------------------------------------|
//! | heading         | `<h1>`-`<h6>`                      | depth outside 1-6 is an error       |
//! | paragraph       | `<p>`                              | unwrapped inside tight list items   |
//! | list / listItem | `<ul>`/`<ol start>` / `<li>`       |                                     |
//! | code            | `<pre><code class="language-X">`   |                                     |
//! | inlineCode      | `<code>`                           |                                     |
//! | blockquote      | `<blockquote>`                     |                                     |
//! | link / image    | `<a href title>` / `<img src alt>` |                                     |
//! | yaml, html      | (dropped)                          | raw HTML is not passed through      |
//! | directives      | their label content                | normally hoisted before rendering   |
//!
//! Unknown containers are transparent: their children are rendered in their place.
//!
//! # Variants
//!
//!     `html` produces the page body as a fragment, one block per line.
//!     `html-document` wraps the same fragment in a standalone HTML5 document titled after the
//!     page's first heading.

mod serializer;

pub use serializer::{serialize_to_html, HtmlOptions};

use crate::error::FormatError;
use crate::format::{Capabilities, Format};
use folio_core::Node;

/// HTML output, either as a fragment or as a full document
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

impl HtmlFormat {
    /// Body content only
    pub fn fragment() -> Self {
        Self {
            options: HtmlOptions { document: false },
        }
    }

    /// Complete `<!DOCTYPE html>` document
    pub fn document() -> Self {
        Self {
            options: HtmlOptions { document: true },
        }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        if self.options.document {
            "html-document"
        } else {
            "html"
        }
    }

    fn description(&self) -> &str {
        if self.options.document {
            "Standalone HTML5 document"
        } else {
            "HTML5 fragment"
        }
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::OUTPUT_ONLY
    }

    fn serialize(&self, node: &Node) -> Result<String, FormatError> {
        serialize_to_html(node, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_format_name() {
        assert_eq!(HtmlFormat::fragment().name(), "html");
        assert_eq!(HtmlFormat::document().name(), "html-document");
        assert_eq!(HtmlFormat::default().name(), "html");
    }

    #[test]
    fn test_html_format_capabilities() {
        let format = HtmlFormat::fragment();
        assert_eq!(format.capabilities(), Capabilities::OUTPUT_ONLY);
    }

    #[test]
    fn test_html_format_extensions() {
        let format = HtmlFormat::document();
        assert_eq!(format.file_extensions(), &["html", "htm"]);
        assert_eq!(format.extension(), "html");
    }
}
