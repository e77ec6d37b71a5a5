//! Query-specific error types
//!
//! A response that arrives for superseded criteria is not an error; it is
//! reported as `Outcome::Discarded`.

use crate::catalog::CatalogError;
use thiserror::Error;

/// Errors surfaced by `PagedQueryController`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The catalog call for `page` failed
    #[error("Failed to load page {page}: {source}")]
    Network {
        page: u32,
        #[source]
        source: CatalogError,
    },
}

impl QueryError {
    /// Page whose fetch failed
    #[must_use]
    pub const fn page(&self) -> u32 {
        match self {
            Self::Network { page, .. } => *page,
        }
    }
}
