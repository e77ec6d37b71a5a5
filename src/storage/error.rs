//! Storage-specific error types
//!
//! These errors are only produced by writes. A read that cannot be decoded is
//! not an error at this layer's callers: the stores log it and fall back to an
//! empty collection.
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`EncodeError`**: Failures when serializing a collection to JSON
//! - **`WriteRejected`**: The backend refused the write (used by `MemoryStore`)

use thiserror::Error;

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a JSON encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] serde_json::Error),

    /// The backend refused to write the given key
    #[error("Write rejected for key '{0}'")]
    WriteRejected(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
