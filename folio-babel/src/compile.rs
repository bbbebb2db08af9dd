//! Markdown source → rendered pages
//!
//! parse (markdown) → scan + paginate (folio-core) → render (selected format)

use crate::error::PipelineError;
use crate::formats::markdown::parse_from_markdown;
use crate::frontmatter::YamlFrontmatter;
use crate::registry::FormatRegistry;
use crate::render::{render, RenderOptions, RenderedPage};
use folio_core::{paginate, Diagnostics, PageCollection, PagingOptions};

pub const DEFAULT_FORMAT: &str = "html";

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub paging: PagingOptions,
    pub render: RenderOptions,
    /// Registry name (or extension) of the output format
    pub format: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            paging: PagingOptions::default(),
            render: RenderOptions::default(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompiledDocument {
    pub collection: PageCollection,
    pub pages: Vec<RenderedPage>,
    pub diagnostics: Diagnostics,
}

/// Parse and paginate without rendering.
pub fn precompile(
    source: &str,
    options: &PagingOptions,
) -> Result<(PageCollection, Diagnostics), PipelineError> {
    let tree = parse_from_markdown(source)?;
    let mut diagnostics = Diagnostics::new();
    let collection = paginate(&tree, options, &YamlFrontmatter, &mut diagnostics)?;
    log::debug!(
        "split document into {} page(s), {} diagnostic(s)",
        collection.len(),
        diagnostics.len()
    );
    Ok((collection, diagnostics))
}

/// Compile with the default formats.
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompiledDocument, PipelineError> {
    compile_with(&FormatRegistry::with_defaults(), source, options)
}

/// Compile, resolving the output format in `registry`.
pub fn compile_with(
    registry: &FormatRegistry,
    source: &str,
    options: &CompileOptions,
) -> Result<CompiledDocument, PipelineError> {
    let format = registry.output(&options.format)?;
    let (collection, diagnostics) = precompile(source, &options.paging)?;
    let pages = render(&collection, &options.render, format)?;
    Ok(CompiledDocument {
        collection,
        pages,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn test_unknown_format_fails_before_parsing() {
        let options = CompileOptions {
            format: "pdf".to_string(),
            ..CompileOptions::default()
        };
        let err = compile("# Hello", &options).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Format(FormatError::FormatNotFound(ref name)) if name == "pdf"
        ));
    }

    #[test]
    fn test_precompile_counts_pages() {
        let (collection, diagnostics) =
            precompile("# One\n\n## Two\n\n### Three\n", &PagingOptions::default()).unwrap();
        assert_eq!(collection.len(), 2);
        assert!(diagnostics.is_empty());
    }
}
