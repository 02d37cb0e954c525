//! Configuration loader for templaty.
//!
//! `defaults/templaty.default.toml` is embedded into the library so that the
//! documented defaults and runtime behavior stay in sync. Callers layer their
//! own files and overrides on top through [`Loader`] before deserializing
//! into [`TemplatyConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/templaty.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplatyConfig {
    pub parser: ParserConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    /// Name reported with every parse error
    pub source_name: String,
}

/// Controls the processor's rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    pub pretty_json: bool,
    pub truncate_labels: usize,
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

    /// Layer TOML text, such as a config section read by the caller.
    pub fn with_toml_str(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TemplatyConfig, ConfigError> {
        let config: TemplatyConfig = self.builder.build()?.try_deserialize()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TemplatyConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parser.source_name, "<input>");
        assert!(config.output.pretty_json);
        assert_eq!(config.output.truncate_labels, 30);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.pretty_json", false)
            .expect("override to apply")
            .set_override("parser.source_name", "page.tpl")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.output.pretty_json);
        assert_eq!(config.parser.source_name, "page.tpl");
    }

    #[test]
    fn layers_toml_text() {
        let config = Loader::new()
            .with_toml_str("[output]\ntruncate_labels = 12\n")
            .build()
            .expect("config to build");
        assert_eq!(config.output.truncate_labels, 12);
        assert!(config.output.pretty_json);
    }

    #[test]
    fn optional_file_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/templaty.toml")
            .build()
            .expect("config to build");
        assert_eq!(config, load_defaults().unwrap());
    }

    #[test]
    fn required_file_must_exist() {
        let result = Loader::new()
            .with_file("/nonexistent/templaty.toml")
            .build();
        assert!(result.is_err());
    }
}
