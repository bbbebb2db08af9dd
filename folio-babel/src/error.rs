//! Error types for format operations and the compile pipeline

use folio_core::CompileError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),
    #[error("{0}")]
    NotSupported(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
    #[error("i/o error: {0}")]
    Io(String),
    /// A formatter failed on one page; rendering stops there.
    #[error("page {index}: {source}")]
    Page {
        index: usize,
        source: Box<FormatError>,
    },
}

/// Anything that can stop [`compile`](crate::compile::compile).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}
