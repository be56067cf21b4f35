// src/utils/errors.rs
//! Error types shared across the reporter

use std::path::PathBuf;
use thiserror::Error;

/// Reporter error
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Configuration could not be built or deserialized
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Unknown `output.format` value
    #[error("Invalid output format: {0} (expected json, xml or html)")]
    InvalidOutputFormat(String),

    /// A record reached the HTML dispatcher without a kind it can render
    #[error("Unmapped record kind for HTML rendering: {kind} (record {class_name}#{method_name})")]
    UnmappedRecordKind {
        kind: String,
        class_name: String,
        method_name: String,
    },

    /// Writing a report or creating its directory failed
    #[error("Storage failed for {path}: {source}")]
    StorageFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializer-level failure
    #[error("Formatting failed: {0}")]
    FormattingFailed(String),
}

impl ReporterError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageFailed {
            path: path.into(),
            source,
        }
    }
}

impl From<::config::ConfigError> for ReporterError {
    fn from(err: ::config::ConfigError) -> Self {
        ReporterError::ConfigError(err.to_string())
    }
}

/// Result type for reporter operations
pub type Result<T> = std::result::Result<T, ReporterError>;
