//! Session-specific error types

use crate::catalog::CatalogError;
use crate::history::HistoryError;
use crate::query::QueryError;
use crate::record::Substance;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by `LookupSession`
#[derive(Debug, Error)]
pub enum SessionError {
    /// A point lookup failed
    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    /// A search page failed to load
    #[error("Query error: {0}")]
    QueryError(#[from] QueryError),

    /// A bookmark write failed
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    /// The substance was fetched but could not be added to history
    #[error("Substance {} was fetched but not recorded in history: {source}", .substance.oon_number)]
    Unrecorded {
        substance: Box<Substance>,
        #[source]
        source: HistoryError,
    },

    /// The session builder is missing a required part
    #[error("Failed to build session: {0}")]
    BuildError(String),
}
