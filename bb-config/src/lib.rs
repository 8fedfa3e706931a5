//! Shared configuration loader for the bb template compiler.
//!
//! `defaults/bb.default.toml` is embedded into the binary so the documented defaults and
//! runtime behavior stay in sync. Applications layer user files and single-key overrides on
//! top of those defaults via [`Loader`] before deserializing into [`BbConfig`].

use bb_codegen::bb::emitter::EmitOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/bb.default.toml");

/// Top-level configuration consumed by bb applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BbConfig {
    pub codegen: CodegenConfig,
    pub output: OutputConfig,
    pub input: InputConfig,
}

/// Shape of the generated Java.
#[derive(Debug, Clone, Deserialize)]
pub struct CodegenConfig {
    pub base_class: String,
    pub indent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub package_prefix: String,
    pub extension: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub marker: String,
}

impl BbConfig {
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            base_class: self.codegen.base_class.clone(),
            indent: self.codegen.indent.clone(),
        }
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

    /// Apply a single key/value override (`--base-class`, `--package-prefix`).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BbConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BbConfig, ConfigError> {
    Loader::new().build()
}
