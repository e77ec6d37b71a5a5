//! Testing utilities for hazsync
//!
//! This module provides helper types and functions for writing tests,
//! including a `TestStore` wrapper for temporary sled stores and a scripted
//! catalog fake.
//!
//! Only available when compiled with `cfg(test)`.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

use crate::catalog::{CatalogError, CatalogService, Lookup, Page, SearchRequest};
use crate::record::Substance;
use crate::storage::SledStore;

/// Wrapper for a temporary sled store that cleans up on drop
///
/// The store lives in its own temporary directory, so parallel tests never
/// share state.
pub struct TestStore {
    // Field order matters: the store must close before its directory goes
    store: SledStore,
    dir: TempDir,
}

impl TestStore {
    /// Create a new empty store in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the directory or the store cannot be created.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = SledStore::open(dir.path().join("state")).expect("Failed to open test store");
        Self { store, dir }
    }

    /// Get a reference to the underlying store
    #[must_use]
    pub const fn store(&self) -> &SledStore {
        &self.store
    }

    /// Get the directory holding the store
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Build a substance with only key and name set
pub fn substance(key: u32, name: &str) -> Substance {
    Substance::new(key, name)
}

/// Build a page of placeholder substances with the given keys
pub fn page_of(keys: &[u32], is_last_page: bool) -> Page {
    let records = keys
        .iter()
        .map(|&key| substance(key, &format!("Substance {key}")))
        .collect();
    Page::new(records, is_last_page)
}

/// Catalog fake answering searches from a queue and lookups from a table
///
/// An exhausted queue answers with an empty last page. Every search request
/// is recorded for later inspection.
#[derive(Default)]
pub struct ScriptedCatalog {
    responses: Mutex<VecDeque<Result<Page, CatalogError>>>,
    requests: Mutex<Vec<SearchRequest>>,
    substances: Mutex<Vec<Substance>>,
    lookups: Mutex<usize>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful search response
    pub fn push_page(&self, page: Page) {
        self.responses.lock().unwrap().push_back(Ok(page));
    }

    /// Queue a failed search response
    pub fn push_error(&self, error: CatalogError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Add or replace a substance served by `lookup`
    pub fn insert(&self, substance: Substance) {
        let mut substances = self.substances.lock().unwrap();
        substances.retain(|s| s.key() != substance.key());
        substances.push(substance);
    }

    /// Search requests received so far
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of lookups received so far
    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }
}

impl CatalogService for ScriptedCatalog {
    fn search(&self, request: &SearchRequest) -> Result<Page, CatalogError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::new(Vec::new(), true)))
    }

    fn lookup(&self, by: &Lookup) -> Result<Substance, CatalogError> {
        *self.lookups.lock().unwrap() += 1;

        let substances = self.substances.lock().unwrap();
        substances
            .iter()
            .find(|s| match by {
                Lookup::RegistryNumber(key) => s.key() == *key,
                Lookup::Name(name) => s.name == *name,
                Lookup::Haz(code) => s.haz.as_ref() == Some(code),
                Lookup::Imdg(code) => s.imdg.as_ref() == Some(code),
                Lookup::Formula(formula) => s.formula.as_ref() == Some(formula),
            })
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(by.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RegistryNumber;
    use crate::storage::KeyValueStore;

    #[test]
    fn test_store_basic() {
        let test_store = TestStore::new();
        assert!(test_store.store().is_empty());
        assert!(test_store.path().exists());
    }

    #[test]
    fn test_store_cleanup() {
        let path = {
            let test_store = TestStore::new();
            test_store.store().set("k", b"v").unwrap();
            test_store.path().to_path_buf()
        };

        assert!(!path.exists());
    }

    #[test]
    fn test_page_of() {
        let page = page_of(&[3, 1], true);
        assert_eq!(page.records[0].key(), RegistryNumber::new(3));
        assert_eq!(page.records[1].name, "Substance 1");
        assert!(page.is_last_page);
    }

    #[test]
    fn test_scripted_catalog_queue_then_default() {
        let catalog = ScriptedCatalog::new();
        catalog.push_error(CatalogError::Network("down".into()));
        let request = SearchRequest {
            search_term: None,
            filters: crate::query::Filters::new(),
            page: 0,
            page_size: 5,
        };

        assert!(catalog.search(&request).is_err());
        assert_eq!(catalog.search(&request).unwrap(), Page::new(Vec::new(), true));
        assert_eq!(catalog.requests().len(), 2);
    }

    #[test]
    fn test_scripted_catalog_lookup_modes() {
        let catalog = ScriptedCatalog::new();
        catalog.insert(substance(1005, "Ammonia").with_formula("NH3"));

        assert!(catalog.lookup(&Lookup::Formula("NH3".into())).is_ok());
        assert!(catalog.lookup(&Lookup::Name("Ammonia".into())).is_ok());
        assert!(matches!(
            catalog.lookup(&Lookup::Imdg("2.3".into())),
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(catalog.lookups(), 3);
    }
}
