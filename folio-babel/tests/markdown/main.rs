//! Markdown format tests, one module per direction.

mod export;
mod import;
