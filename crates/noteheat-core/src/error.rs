//! Core error types for noteheat-core.
//!
//! This module defines the error hierarchy using thiserror. Per-document read
//! failures are not errors at this level: the aggregator records and skips
//! them. Only failures that reject a whole operation surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for noteheat-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Corpus-related errors
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`crate::corpus::CorpusProvider`].
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The store cannot be enumerated at all.
    #[error("Corpus at {root} is unavailable: {message}")]
    Unavailable { root: PathBuf, message: String },

    /// A single document could not be read.
    #[error("Failed to read document '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not known to the store.
    #[error("Document not found: {0}")]
    NotFound(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A date key that is not `YYYY-MM-DD`.
    #[error("Invalid date key '{0}': expected YYYY-MM-DD")]
    InvalidDateKey(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
