//! Shared configuration loader for folio.
//!
//! `defaults/folio.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`FolioConfig`], then turn the
//! result into [`CompileOptions`] with [`FolioConfig::compile_options`]. Matcher shapes are
//! checked at that point, before any document is read.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use folio_babel::{CompileOptions, RenderOptions, Template};
use folio_core::{normalize, ConfigurationError, MatchSpec, Matcher, PagingOptions};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/folio.default.toml");

/// Top-level configuration consumed by folio applications.
#[derive(Debug, Clone, Deserialize)]
pub struct FolioConfig {
    pub paging: PagingConfig,
    pub render: RenderConfig,
}

/// What opens a page and what counts as metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    #[serde(default)]
    pub boundary: Option<MatchSpec>,
    pub max_depth: u64,
    pub directives: Vec<String>,
    pub frontmatter: String,
}

/// Output naming and format.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub format: String,
    pub base_name: String,
    #[serde(default)]
    pub extension: Option<String>,
    pub first_index: usize,
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl FolioConfig {
    pub fn compile_options(&self) -> Result<CompileOptions, ConfigurationError> {
        Ok(CompileOptions {
            paging: self.paging.paging_options()?,
            render: self.render.render_options()?,
            format: self.render.format.clone(),
        })
    }
}

impl PagingConfig {
    pub fn paging_options(&self) -> Result<PagingOptions, ConfigurationError> {
        let boundary = match &self.boundary {
            Some(spec) => normalize(spec.clone())?,
            None if self.max_depth == 0 => {
                return Err(ConfigurationError::new(
                    "paging.max_depth must be at least 1",
                ))
            }
            None => Matcher::heading_up_to(self.max_depth),
        };
        let directives = self
            .directives
            .iter()
            .map(|kind| normalize(kind.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PagingOptions::default()
            .with_boundary(boundary)
            .with_directive(Matcher::any_of(directives))
            .with_frontmatter(normalize(self.frontmatter.as_str())?))
    }
}

impl RenderConfig {
    pub fn render_options(&self) -> Result<RenderOptions, ConfigurationError> {
        if self.base_name.trim().is_empty() {
            return Err(ConfigurationError::new("render.base_name must not be empty"));
        }
        let template = match &self.template {
            Some(path) => Some(Template::new(fs::read_to_string(path).map_err(|e| {
                ConfigurationError::new(format!(
                    "cannot read template {}: {}",
                    path.display(),
                    e
                ))
            })?)),
            None => None,
        };
        Ok(RenderOptions {
            base_name: self.base_name.clone(),
            extension: self.extension.clone(),
            first_index: self.first_index,
            template,
        })
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<FolioConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FolioConfig, ConfigError> {
    Loader::new().build()
}
