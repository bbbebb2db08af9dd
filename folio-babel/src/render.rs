//! Render stage
//!
//! Turns a [`PageCollection`] into named, serialized pages. Formatting itself belongs to the
//! [`Format`]; this module only sequences pages, merges metadata, names files and applies the
//! optional template.
//!
//! File names follow `base_name + seq + "." + extension` where `seq = first_index + index` and
//! a zero `seq` is left out, so the default naming is `page.html`, `page1.html`, `page2.html`...

use crate::error::FormatError;
use crate::format::{unsupported, Format};
use crate::template::{Template, TemplateContext};
use folio_core::{merge_metadata, Metadata, PageCollection};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_NAME: &str = "page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub base_name: String,
    /// Overrides the format's canonical extension
    pub extension: Option<String>,
    pub first_index: usize,
    pub template: Option<Template>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_string(),
            extension: None,
            first_index: 0,
            template: None,
        }
    }
}

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub sequence: usize,
    pub filename: String,
    /// The extension the page was written with
    pub format: String,
    pub contents: String,
    pub metadata: Metadata,
}

/// Render every page, stopping at the first formatter error.
pub fn render(
    collection: &PageCollection,
    options: &RenderOptions,
    format: &dyn Format,
) -> Result<Vec<RenderedPage>, FormatError> {
    if !format.capabilities().serialize {
        return Err(unsupported(format.name(), "serialization"));
    }
    let extension = options
        .extension
        .as_deref()
        .unwrap_or_else(|| format.extension())
        .to_string();

    let mut rendered = Vec::with_capacity(collection.len());
    for (index, page) in collection.iter().enumerate() {
        let sequence = options.first_index + index;
        let metadata = merge_metadata(&collection.global_metadata, &page.metadata);

        let serialized = format
            .serialize(&page.content)
            .map_err(|source| FormatError::Page {
                index,
                source: Box::new(source),
            })?;
        let mut contents = serialized.trim().to_string();

        if let Some(template) = &options.template {
            let title = metadata
                .get("title")
                .cloned()
                .or_else(|| page.title())
                .unwrap_or_else(|| options.base_name.clone());
            contents = template.render(&TemplateContext {
                contents: &contents,
                title: &title,
                metadata: &metadata,
            });
        }

        let filename = file_name(&options.base_name, sequence, &extension);
        log::debug!("rendered {} ({} bytes)", filename, contents.len());
        rendered.push(RenderedPage {
            sequence,
            filename,
            format: extension.clone(),
            contents,
            metadata,
        });
    }
    Ok(rendered)
}

pub fn file_name(base_name: &str, sequence: usize, extension: &str) -> String {
    if sequence == 0 {
        format!("{base_name}.{extension}")
    } else {
        format!("{base_name}{sequence}.{extension}")
    }
}

/// Write pages under `dir`, creating it if needed. Returns the written paths in page order.
pub fn write_pages(pages: &[RenderedPage], dir: &Path) -> Result<Vec<PathBuf>, FormatError> {
    fs::create_dir_all(dir)
        .map_err(|e| FormatError::Io(format!("cannot create {}: {}", dir.display(), e)))?;

    pages
        .iter()
        .map(|page| {
            let path = dir.join(&page.filename);
            fs::write(&path, &page.contents)
                .map_err(|e| FormatError::Io(format!("cannot write {}: {}", path.display(), e)))?;
            Ok(path)
        })
        .collect()
}
