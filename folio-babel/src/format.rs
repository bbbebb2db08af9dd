//! The seam between folio's page model and concrete text formats
//!
//! A [`Format`] is anything that can turn a page's [`Node`] tree into text, read text into a
//! tree, or both. Which directions a format handles is declared up front through
//! [`Capabilities`], so the registry and the render stage can refuse a format before any page
//! is touched.

use crate::error::FormatError;
use folio_core::Node;

/// Directions a format handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub parse: bool,
    pub serialize: bool,
}

impl Capabilities {
    pub const OUTPUT_ONLY: Self = Self {
        parse: false,
        serialize: true,
    };

    pub const BOTH: Self = Self {
        parse: true,
        serialize: true,
    };
}

/// A named text format.
///
/// ```ignore
/// struct Plain;
///
/// impl Format for Plain {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn capabilities(&self) -> Capabilities {
///         Capabilities::OUTPUT_ONLY
///     }
///
///     fn serialize(&self, page: &Node) -> Result<String, FormatError> {
///         Ok(page.text_content())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, e.g. "markdown"
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions this format answers to. The first one names output files.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn extension(&self) -> &str {
        match self.file_extensions().first() {
            Some(extension) => extension,
            None => self.name(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn parse(&self, _source: &str) -> Result<Node, FormatError> {
        Err(unsupported(self.name(), "parsing"))
    }

    /// Turn one page (a `root` node) into text.
    fn serialize(&self, _page: &Node) -> Result<String, FormatError> {
        Err(unsupported(self.name(), "serialization"))
    }
}

pub(crate) fn unsupported(format: &str, direction: &str) -> FormatError {
    FormatError::NotSupported(format!("format '{}' does not support {}", format, direction))
}
