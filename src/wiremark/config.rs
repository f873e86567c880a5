//! Configuration loader
//!
//! `defaults/wiremark.default.toml` is embedded into the crate so that the documented
//! defaults and runtime behavior stay in sync. Callers layer user files and CLI
//! overrides on top of them via [`Loader`] before deserializing into
//! [`WiremarkConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::wiremark::lexing::LexOptions;
use crate::wiremark::pipeline::CompileOptions;

const DEFAULT_TOML: &str = include_str!("../../defaults/wiremark.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WiremarkConfig {
    pub lexer: LexerConfig,
    pub ids: IdsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LexerConfig {
    pub expand_tabs: bool,
    pub tab_width: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdsConfig {
    pub reuse_previous: bool,
}

/// Defaults for the `compile` command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub pretty: bool,
}

impl WiremarkConfig {
    /// Options for [compile_with_options](crate::wiremark::pipeline::compile_with_options).
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            lex: LexOptions {
                expand_tabs: self.lexer.expand_tabs,
                tab_width: self.lexer.tab_width.max(1),
            },
            reuse_previous: self.ids.reuse_previous,
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

    /// Layer an optional configuration file, ignored when absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a CLI flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<WiremarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<WiremarkConfig, ConfigError> {
    Loader::new().build()
}
