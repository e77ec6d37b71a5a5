//! Catalog-specific error types
//!
//! Produced by `CatalogService` implementations. Variants hold plain strings
//! so errors can be cloned into the query controller's observable state.

use thiserror::Error;

/// Errors returned by the remote catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request never produced a response (connection, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("Catalog returned status {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body could not be decoded
    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    /// A point lookup matched nothing
    #[error("No substance found for {0}")]
    NotFound(String),

    /// The request was rejected before being sent
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
