//! History-specific error types

use super::RecencyEntry;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by `RecencyStore` mutations
///
/// Reads never fail: unreadable history is treated as empty.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The updated list was computed but could not be written.
    /// `entries` holds that list; the persisted history is unchanged.
    #[error("Failed to persist history of {} entries: {source}", .entries.len())]
    Persist {
        entries: Vec<RecencyEntry>,
        #[source]
        source: StorageError,
    },

    /// The persisted history could not be deleted
    #[error("Failed to clear history: {0}")]
    Clear(#[source] StorageError),
}

impl HistoryError {
    /// The storage failure behind this error
    #[must_use]
    pub const fn storage_error(&self) -> &StorageError {
        match self {
            Self::Persist { source, .. } | Self::Clear(source) => source,
        }
    }
}
