//! Storage error types.
//!
//! Every variant is an infrastructure-class condition. Business-rule
//! outcomes (not found, already verified, ...) are modeled as `Ok` values
//! or service-layer errors, never as storage errors — the failover
//! decorator relies on this to know that anything surfacing here warrants
//! a retry against the fallback backend.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend unreachable or connection lost.
    #[error("storage connection error: {0}")]
    Connection(String),

    /// Query failed inside the backend.
    #[error("storage query error: {0}")]
    Query(String),

    /// Local filesystem I/O failed.
    #[error("storage io error: {0}")]
    Io(String),

    /// Record could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(String),

    /// Internal storage error.
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
