//! Page templates
//!
//!     A template is plain text with `{{ name }}` placeholders:
//!
//!         <html><head><title>{{ title }}</title></head><body>{{ contents }}</body></html>
//!
//!     `contents` is the serialized page and `title` the page title (metadata `title`, then the
//!     page heading, then the base file name). Any other name is looked up in the merged page
//!     metadata; unknown names render as nothing. Substituted values are inserted verbatim.

use folio_core::Metadata;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][\w.-]*)\s*\}\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

/// Values available to a template for one page.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub contents: &'a str,
    pub title: &'a str,
    pub metadata: &'a Metadata,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn render(&self, context: &TemplateContext<'_>) -> String {
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures<'_>| {
                match &caps[1] {
                    "contents" => context.contents.to_string(),
                    "title" => context.title.to_string(),
                    key => context.metadata.get(key).cloned().unwrap_or_default(),
                }
            })
            .into_owned()
    }
}
