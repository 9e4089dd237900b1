//! Cross-cutting error types for Convene.
//!
//! Domain-specific errors (`AuthError`, `ApiError`, `ConfigError`) are defined
//! in their respective crates. The binary converges them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Convene crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value could not be parsed into a domain type.
    #[error("Invalid {field}: {reason}")]
    Parse { field: String, reason: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised by a [`crate::KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be read.
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    /// The backend could not be written.
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    /// The entry could not be removed.
    #[error("failed to remove '{key}': {reason}")]
    Remove { key: String, reason: String },

    /// The backend itself is unusable (no home directory, poisoned lock, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
