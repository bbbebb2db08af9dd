//! Output format lookup
//!
//! Formats are keyed by name. Each registration also claims the format's file extensions,
//! first come first served, so `md` resolves to the markdown format and `htm` to the HTML
//! fragment format even though the document variant answers to the same extensions.

use crate::error::FormatError;
use crate::format::{unsupported, Format};
use crate::formats::html::HtmlFormat;
use crate::formats::markdown::MarkdownFormat;
use std::collections::{BTreeMap, HashMap};

pub struct FormatRegistry {
    formats: BTreeMap<String, Box<dyn Format>>,
    extensions: HashMap<String, String>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self {
            formats: BTreeMap::new(),
            extensions: HashMap::new(),
        }
    }

    /// markdown, html and html-document
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownFormat);
        registry.register(HtmlFormat::fragment());
        registry.register(HtmlFormat::document());
        registry
    }

    /// Add `format`, replacing any format of the same name.
    ///
    /// Extensions already claimed by another format stay with that format.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        let name = format.name().to_string();
        for extension in format.file_extensions() {
            self.extensions
                .entry(extension.to_string())
                .or_insert_with(|| name.clone());
        }
        self.formats.insert(name, Box::new(format));
    }

    /// Resolve a format by name, then by extension.
    pub fn get(&self, key: &str) -> Result<&dyn Format, FormatError> {
        let name = match self.formats.contains_key(key) {
            true => key,
            false => self
                .extensions
                .get(key)
                .map(String::as_str)
                .unwrap_or(key),
        };
        self.formats
            .get(name)
            .map(|format| format.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(key.to_string()))
    }

    /// Like [`get`](Self::get), but only formats that can write pages.
    pub fn output(&self, key: &str) -> Result<&dyn Format, FormatError> {
        let format = self.get(key)?;
        if !format.capabilities().serialize {
            return Err(unsupported(format.name(), "serialization"));
        }
        Ok(format)
    }

    /// Registered formats in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Format> {
        self.formats.values().map(|format| format.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.formats.keys().map(String::as_str).collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
