//! Core error types for pullfocus-core.
//!
//! Storage failures never escape a timer, log or settings operation; they are
//! logged and swallowed by [`crate::storage::JsonSlot`]. The only error a
//! caller of the engine sees is a [`ValidationError`] for rejected settings.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pullfocus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence port errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Host configuration errors
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

    /// The timer service task is no longer running
    #[error("Timer service has stopped")]
    ServiceStopped,
}

/// Errors raised by a [`crate::storage::KeyValueStore`] implementation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite backend failure
    #[error("SQLite failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The store's lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,

    /// The store refused the operation (e.g. quota, injected failure)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failure while preparing the store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Host configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Settings input rejected before it reaches the settings store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A duration or the round interval was zero
    #[error("'{field}' must be a positive integer")]
    NonPositive { field: &'static str },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl<T> From<std::sync::PoisonError<T>> for StorageError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StorageError::Poisoned
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
