//! Format implementations

pub mod html;
pub mod markdown;

use crate::error::FormatError;
use folio_core::Node;

/// Heading depth, rejecting what neither Markdown nor HTML can express.
pub(crate) fn heading_depth(node: &Node) -> Result<usize, FormatError> {
    match node.depth() {
        Some(depth @ 1..=6) => Ok(depth as usize),
        Some(depth) => Err(FormatError::SerializationError(format!(
            "heading depth {depth} is out of range 1-6"
        ))),
        None => Err(FormatError::SerializationError(
            "heading without a depth".to_string(),
        )),
    }
}
