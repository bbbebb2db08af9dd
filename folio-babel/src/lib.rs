//! Multi-format I/O and rendering for folio
//!
//!     folio-core works on trees only. This crate connects it to text: it parses markdown into
//!     a tree, serializes pages back out as markdown or HTML, reads YAML front-matter, and runs
//!     the whole compile pipeline.
//!
//! Architecture
//!
//!     Formats implement the [`Format`] trait and are looked up by name (or file extension) in a
//!     [`FormatRegistry`]. Parsing and serialization are independent capabilities: markdown
//!     does both, the HTML formats only serialize.
//!
//!     The render stage ([`render::render`]) knows nothing about formatting. It sequences pages,
//!     merges global and page metadata, names files and applies an optional [`Template`].
//!
//! File Structure
//!
//!     src
//!       ├── error.rs          FormatError, PipelineError
//!       ├── format.rs         Format trait
//!       ├── registry.rs       FormatRegistry
//!       ├── formats
//!       │     ├── markdown    comrak parser, directives, serializer
//!       │     └── html        rcdom serializer, fragment and document variants
//!       ├── frontmatter.rs    YAML front-matter → metadata
//!       ├── template.rs       `{{ placeholder }}` templates
//!       ├── render.rs         PageCollection → RenderedPage
//!       └── compile.rs        source → CompiledDocument

pub mod compile;
pub mod error;
pub mod format;
pub mod formats;
pub mod frontmatter;
pub mod registry;
pub mod render;
pub mod template;

pub use compile::{compile, compile_with, precompile, CompileOptions, CompiledDocument};
pub use error::{FormatError, PipelineError};
pub use format::{Capabilities, Format};
pub use frontmatter::YamlFrontmatter;
pub use registry::FormatRegistry;
pub use render::{render, write_pages, RenderOptions, RenderedPage};
pub use template::{Template, TemplateContext};
