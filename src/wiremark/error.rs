//! Errors of the tooling layer
//!
//! Compiling never fails: problems in a document are [diagnostics](crate::wiremark::diagnostics).
//! [`ProcessingError`] covers what can go wrong around compilation: reading files,
//! loading configuration and choosing an output format.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown format `{0}` (run `wiremark formats` for the list)")]
    UnknownFormat(String),

    #[error("invalid previous AST: {0}")]
    InvalidPrevious(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<serde_json::Error> for ProcessingError {
    fn from(err: serde_json::Error) -> Self {
        ProcessingError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ProcessingError {
    fn from(err: serde_yaml::Error) -> Self {
        ProcessingError::Serialization(err.to_string())
    }
}
