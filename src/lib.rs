//! Hazsync - local state synchronization for hazardous-substance lookup clients
//!
//! This library keeps a bounded list of recently viewed substances and an
//! unbounded bookmark set in durable key-value storage, and drives paged,
//! filtered catalog searches without letting stale responses overwrite
//! fresh results.

use thiserror::Error;

pub mod bookmarks;
pub mod catalog;
pub mod config;
pub mod history;
pub mod query;
pub mod record;
pub mod session;
pub mod storage;

#[cfg(test)]
pub mod testing;

pub use bookmarks::{SavedEntry, SavedSet};
pub use catalog::{CatalogError, CatalogService, Lookup, Page, SearchRequest};
pub use crate::config::HazsyncConfig;
pub use history::{HistoryError, RecencyEntry, RecencyStore};
pub use query::{FetchTicket, Outcome, PagedQueryController, QueryError};
pub use record::{RecordSummary, RegistryNumber, Substance};
pub use session::{LookupSession, SessionError};
pub use storage::{KeyValueStore, MemoryStore, SledStore, StorageError};

/// Error enum, contains all failure states of the library
#[derive(Debug, Error)]
pub enum HazsyncError {
    /// Storage error
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    /// History error
    #[error("History error: {0}")]
    HistoryError(#[from] HistoryError),
    /// Catalog error
    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),
    /// Query error
    #[error("Query error: {0}")]
    QueryError(#[from] QueryError),
    /// Session error
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
}
