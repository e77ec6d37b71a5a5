//! Saved (bookmarked) substances
//!
//! `SavedSet` keeps every substance the user explicitly bookmarked, newest
//! first, with no size bound. The set is persisted as one JSON array under
//! [`BOOKMARKS_KEY`]. Membership is decided by registry number only, so
//! saving a record whose fields changed on the server replaces the old entry
//! instead of adding a second one.
//!
//! Membership queries always read storage; another screen may have changed
//! the set since the last call.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::record::{RegistryNumber, Substance};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key of the persisted bookmarks
pub const BOOKMARKS_KEY: &str = "user_bookmarks";

/// A bookmarked substance and when it was saved
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SavedEntry {
    #[serde(flatten)]
    pub substance: Substance,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl SavedEntry {
    #[must_use]
    pub const fn key(&self) -> RegistryNumber {
        self.substance.oon_number
    }
}

/// Unbounded, deduplicated, most-recently-saved-first bookmark set
pub struct SavedSet<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> SavedSet<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Save `substance`, replacing any entry with the same registry number
    ///
    /// The saved entry moves to the front with a fresh timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated set cannot be written; the
    /// persisted set is left as it was.
    pub fn add(&self, substance: &Substance) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let key = substance.key();
        let mut entries = self.list();
        entries.retain(|entry| entry.key() != key);
        entries.insert(
            0,
            SavedEntry {
                substance: substance.clone(),
                timestamp: Utc::now().trunc_subsecs(3),
            },
        );

        self.persist(&entries).inspect_err(|e| {
            warn!(%key, error = %e, "failed to persist bookmark");
        })?;
        debug!(%key, len = entries.len(), "saved bookmark");
        Ok(())
    }

    /// Remove the entry for `key`
    ///
    /// Returns `false` when nothing was saved under `key`; storage is not
    /// written in that case.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated set cannot be written.
    pub fn remove(&self, key: RegistryNumber) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|entry| entry.key() != key);
        if entries.len() == before {
            return Ok(false);
        }

        self.persist(&entries).inspect_err(|e| {
            warn!(%key, error = %e, "failed to persist bookmark removal");
        })?;
        debug!(%key, len = entries.len(), "removed bookmark");
        Ok(true)
    }

    /// Add `substance` if it is not saved, remove it if it is
    ///
    /// Returns whether the substance is saved afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn toggle(&self, substance: &Substance) -> Result<bool, StorageError> {
        if self.remove(substance.key())? {
            Ok(false)
        } else {
            self.add(substance)?;
            Ok(true)
        }
    }

    /// Whether `key` is currently saved
    #[must_use]
    pub fn contains(&self, key: RegistryNumber) -> bool {
        self.list().iter().any(|entry| entry.key() == key)
    }

    /// The saved entry for `key`, if any
    #[must_use]
    pub fn get(&self, key: RegistryNumber) -> Option<SavedEntry> {
        self.list().into_iter().find(|entry| entry.key() == key)
    }

    /// All saved entries, most recently saved first
    ///
    /// Missing, unreadable, or undecodable storage is returned as empty.
    #[must_use]
    pub fn list(&self) -> Vec<SavedEntry> {
        let bytes = match self.store.get(BOOKMARKS_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read bookmarks, treating them as empty");
                return Vec::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(error = %e, "bookmarks payload is corrupt, treating it as empty");
            Vec::new()
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// Delete every bookmark
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.delete(BOOKMARKS_KEY)?;
        debug!("cleared bookmarks");
        Ok(())
    }

    fn persist(&self, entries: &[SavedEntry]) -> Result<(), StorageError> {
        let payload = serde_json::to_vec(entries)?;
        self.store.set(BOOKMARKS_KEY, &payload)
    }
}
