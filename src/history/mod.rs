//! Recently viewed substances
//!
//! `RecencyStore` keeps a short most-recent-first list of the substances a
//! user opened. The list is persisted as one JSON array under
//! [`HISTORY_KEY`]; every mutation re-reads the full list, rewrites it, and
//! stores it back in one write.
//!
//! Invariants after every `record`:
//! - at most one entry per registry number
//! - newest first
//! - never longer than the store's capacity

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::record::{RecordSummary, RegistryNumber, Substance};
use crate::storage::KeyValueStore;

pub mod error;

pub use error::HistoryError;

/// Storage key of the persisted history
pub const HISTORY_KEY: &str = "search_history";

/// Number of entries kept when no capacity is configured
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// A viewed substance and when it was last viewed
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RecencyEntry {
    #[serde(flatten)]
    pub summary: RecordSummary,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl RecencyEntry {
    /// Build an entry for `substance` stamped with the current time
    ///
    /// The timestamp is cut to the millisecond precision it is stored with.
    #[must_use]
    pub fn now(substance: &Substance) -> Self {
        Self {
            summary: substance.summary(),
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    #[must_use]
    pub const fn key(&self) -> RegistryNumber {
        self.summary.oon_number
    }
}

/// Bounded, deduplicated, most-recent-first history
pub struct RecencyStore<S> {
    store: S,
    capacity: usize,
    // Serializes read-modify-write cycles issued through this handle
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> RecencyStore<S> {
    /// Create a history with the default capacity
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self::with_capacity(store, DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history keeping at most `capacity` entries (at least one)
    #[must_use]
    pub const fn with_capacity(store: S, capacity: usize) -> Self {
        let capacity = if capacity == 0 { 1 } else { capacity };
        Self {
            store,
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record that `substance` was viewed
    ///
    /// Any previous entry for the same registry number is dropped, the new
    /// entry goes to the front, and the list is cut to capacity before it is
    /// written. Returns the resulting list.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Persist` if the write fails. The error carries
    /// the computed list; the persisted history keeps its previous contents.
    pub fn record(&self, substance: &Substance) -> Result<Vec<RecencyEntry>, HistoryError> {
        self.push(RecencyEntry::now(substance))
    }

    /// Insert a prepared entry, with the same semantics as `record`
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Persist` if the write fails.
    pub fn push(&self, entry: RecencyEntry) -> Result<Vec<RecencyEntry>, HistoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let key = entry.key();
        let mut entries = self.list();
        entries.retain(|existing| existing.key() != key);
        entries.insert(0, entry);
        entries.truncate(self.capacity);

        if let Err(source) = self.persist(&entries) {
            warn!(%key, error = %source, "failed to persist history");
            return Err(HistoryError::Persist { entries, source });
        }

        debug!(%key, len = entries.len(), "recorded history entry");
        Ok(entries)
    }

    /// Current history, newest first
    ///
    /// Missing, unreadable, or undecodable history is returned as empty.
    #[must_use]
    pub fn list(&self) -> Vec<RecencyEntry> {
        let bytes = match self.store.get(HISTORY_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read history, treating it as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<RecencyEntry>>(&bytes) {
            Ok(mut entries) => {
                // A payload written with a larger capacity still honours ours
                entries.truncate(self.capacity);
                entries
            }
            Err(e) => {
                warn!(error = %e, "history payload is corrupt, treating it as empty");
                Vec::new()
            }
        }
    }

    /// Delete the persisted history
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Clear` if the backend rejects the delete.
    pub fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.delete(HISTORY_KEY).map_err(HistoryError::Clear)?;
        debug!("cleared history");
        Ok(())
    }

    fn persist(&self, entries: &[RecencyEntry]) -> Result<(), crate::storage::StorageError> {
        let payload = serde_json::to_vec(entries)?;
        self.store.set(HISTORY_KEY, &payload)
    }
}
