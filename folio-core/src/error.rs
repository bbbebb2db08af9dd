//! Error kinds
//!
//!     Structural problems abort a compile call and are returned as errors. Problems with the
//!     content itself (a directive with nowhere to go, for instance) are not errors: they are
//!     reported through [`crate::diagnostics::Diagnostics`] and processing carries on.

use crate::ast::Position;
use crate::cursor::TreePath;
use thiserror::Error;

/// An invalid matcher or option, detected while building the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration: {message}")]
pub struct ConfigurationError {
    pub message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("the tree root cannot be replaced or removed through a cursor")]
    RootMutation,
    #[error("path {0} does not resolve to a node")]
    InvalidPath(TreePath),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    #[error("front-matter syntax error{}: {message}", location(.line, .column))]
    Syntax {
        message: String,
        /// The offending front-matter payload.
        text: String,
        /// 1-based. A [`FrontmatterParser`](crate::paging::FrontmatterParser) reports it
        /// within the payload; once it leaves [`paginate`](crate::paging::paginate) it is a
        /// line of the whole document.
        line: Option<usize>,
        column: Option<usize>,
    },
}

impl FrontmatterError {
    /// Move a payload location into the document, given the position of the block's opening
    /// fence. The payload starts on the line below the fence.
    pub fn within_document(self, block: Option<Position>) -> Self {
        let Some(block) = block else {
            return self;
        };
        match self {
            FrontmatterError::Syntax {
                message,
                text,
                line,
                column,
            } => FrontmatterError::Syntax {
                message,
                text,
                line: line.map(|line| line + block.line),
                column,
            },
        }
    }
}

fn location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at {}:{}", line, column),
        (Some(line), None) => format!(" at line {}", line),
        _ => String::new(),
    }
}

/// Everything that can abort a compile call.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}
