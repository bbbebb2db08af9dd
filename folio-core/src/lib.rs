//! # folio-core
//!
//! Splits an annotated markdown syntax tree into pages and hoists the metadata scattered through
//! it (front-matter blocks, directives) onto the page or document it belongs to.
//!
//! File Layout
//!
//!     The crate is layered, each module only depending on the ones above it:
//!
//!     src
//!       ├── ast           Node model (a unist-style tagged tree) and builders
//!       ├── matcher       Match specifications normalized into one predicate type
//!       ├── cursor        Locate / replace / remove / ancestor search over a tree
//!       ├── scanning      Single document-order pass collecting nodes of interest
//!       ├── paging        Page segmentation, directive hoisting, metadata merge
//!       ├── diagnostics   Non-fatal findings collected per compile call
//!       └── error         Fatal error kinds
//!
//!     Parsing markdown into a [`Node`] tree and serializing pages back out live elsewhere
//!     (see the folio-babel crate). This crate only ever sees trees.
//!
//! Tree Discipline
//!
//!     Trees are plain owned values. Reads go through [`cursor::Cursor`], which borrows the tree;
//!     mutations consume the cursor and hand back a new root, so a cursor can never be used
//!     against a tree it was not issued for. The paging passes clone the input once and then edit
//!     the owned copy through [`cursor::TreePath`].

pub mod ast;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod matcher;
pub mod paging;
pub mod scanning;

pub use ast::{Node, Position};
pub use cursor::{find, find_all, AncestorStep, Cursor, TreePath};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{CompileError, ConfigurationError, FrontmatterError, TreeError};
pub use matcher::{normalize, MatchSpec, Matcher};
pub use paging::{
    merge_metadata, paginate, FrontmatterParser, Metadata, PageCollection, PageRecord,
    PagingOptions,
};
pub use scanning::{scan, ScanRules, ScannedKind, ScannedNode};
