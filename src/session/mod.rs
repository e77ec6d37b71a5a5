//! Session state and builder pattern
//!
//! `LookupSession` wires the local stores and the search controller to one
//! catalog, the way a lookup screen uses them:
//! ```no_run
//! use hazsync::session::LookupSession;
//! use hazsync::storage::MemoryStore;
//! # use hazsync::catalog::CatalogService;
//! # fn example<C: CatalogService>(catalog: C) -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = LookupSession::builder()
//!     .store(MemoryStore::new())
//!     .catalog(catalog)
//!     .build()?;
//!
//! session.set_search_term("ammonia")?;
//! if let Some(first) = session.controller().records().first().cloned() {
//!     session.select(&first)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The stores and the controller stay independent: only the session records
//! viewed substances in history or touches bookmarks.

use std::sync::Arc;
use tracing::debug;

use crate::HazsyncConfig;
use crate::bookmarks::SavedSet;
use crate::catalog::{CatalogService, Lookup};
use crate::history::{HistoryError, RecencyEntry, RecencyStore};
use crate::query::{FilterDimension, FilterValue, Outcome, PagedQueryController, QueryError};
use crate::record::{RegistryNumber, Substance};
use crate::storage::{KeyValueStore, StorageError};

pub mod error;

pub use error::SessionError;

/// History, bookmarks and paged search sharing one storage backend
pub struct LookupSession<S, C> {
    history: RecencyStore<Arc<S>>,
    bookmarks: SavedSet<Arc<S>>,
    controller: PagedQueryController,
    catalog: C,
}

impl<S: KeyValueStore, C: CatalogService> LookupSession<S, C> {
    /// Create a new builder for constructing a `LookupSession`
    #[must_use]
    pub fn builder() -> LookupSessionBuilder<S, C> {
        LookupSessionBuilder::new()
    }

    /// Record that the user opened `substance`
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if history cannot be written.
    pub fn select(&self, substance: &Substance) -> Result<Vec<RecencyEntry>, HistoryError> {
        self.history.record(substance)
    }

    /// Fetch one substance and record it in history
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CatalogError` if the lookup is blank or fails,
    /// and `SessionError::Unrecorded`, carrying the fetched substance, if
    /// history cannot be written.
    pub fn lookup(&self, by: &Lookup) -> Result<Substance, SessionError> {
        by.validate()?;
        let substance = self.catalog.lookup(by)?;
        debug!(%by, key = %substance.key(), "looked up substance");

        match self.history.record(&substance) {
            Ok(_) => Ok(substance),
            Err(source) => Err(SessionError::Unrecorded {
                substance: Box::new(substance),
                source,
            }),
        }
    }

    /// Save `substance` if it is not saved, remove it otherwise
    ///
    /// Returns whether it is saved afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bookmark set cannot be written.
    pub fn toggle_bookmark(&self, substance: &Substance) -> Result<bool, StorageError> {
        self.bookmarks.toggle(substance)
    }

    #[must_use]
    pub fn is_bookmarked(&self, key: RegistryNumber) -> bool {
        self.bookmarks.contains(key)
    }

    /// Re-fetch a saved substance and store the fresh copy
    ///
    /// The refreshed entry moves to the front. A substance that is no longer
    /// saved is fetched but not re-added.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the lookup or the bookmark write fails.
    pub fn refetch_bookmark(&self, key: RegistryNumber) -> Result<Substance, SessionError> {
        let substance = self.catalog.lookup(&Lookup::RegistryNumber(key))?;
        if self.bookmarks.contains(key) {
            self.bookmarks.add(&substance)?;
            debug!(%key, "refreshed bookmark");
        }
        Ok(substance)
    }

    /// Change the search term and load its first page
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the first page fails to load.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> Result<Outcome, QueryError> {
        let ticket = self.controller.set_search_term(term);
        self.controller.run(&self.catalog, ticket)
    }

    /// Select a filter value and load the first page
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the first page fails to load.
    pub fn set_filter(&mut self, value: FilterValue) -> Result<Outcome, QueryError> {
        let ticket = self.controller.set_filter(value);
        self.controller.run(&self.catalog, ticket)
    }

    /// Unset a filter dimension and load the first page
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the first page fails to load.
    pub fn clear_filter(&mut self, dimension: FilterDimension) -> Result<Outcome, QueryError> {
        let ticket = self.controller.clear_filter(dimension);
        self.controller.run(&self.catalog, ticket)
    }

    /// Reload the first page for the current criteria
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the page fails to load.
    pub fn refresh(&mut self) -> Result<Outcome, QueryError> {
        let ticket = self.controller.refresh();
        self.controller.run(&self.catalog, ticket)
    }

    /// Load the next page, if there is one
    ///
    /// Returns `Ok(None)` when the controller suppressed the request.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the page fails to load.
    pub fn load_more(&mut self) -> Result<Option<Outcome>, QueryError> {
        match self.controller.load_more() {
            Some(ticket) => self.controller.run(&self.catalog, ticket).map(Some),
            None => Ok(None),
        }
    }

    #[must_use]
    pub const fn history(&self) -> &RecencyStore<Arc<S>> {
        &self.history
    }

    #[must_use]
    pub const fn bookmarks(&self) -> &SavedSet<Arc<S>> {
        &self.bookmarks
    }

    #[must_use]
    pub const fn controller(&self) -> &PagedQueryController {
        &self.controller
    }

    /// Mutable controller access, for callers that execute tickets themselves
    pub const fn controller_mut(&mut self) -> &mut PagedQueryController {
        &mut self.controller
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }
}

/// Builder for `LookupSession`
///
/// Store and catalog are required; sizes come from a `HazsyncConfig` when
/// one is given and from the defaults otherwise.
pub struct LookupSessionBuilder<S, C> {
    store: Option<Arc<S>>,
    catalog: Option<C>,
    config: HazsyncConfig,
}

impl<S: KeyValueStore, C: CatalogService> LookupSessionBuilder<S, C> {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            catalog: None,
            config: HazsyncConfig::default(),
        }
    }

    /// Set the storage backend (required)
    #[must_use]
    pub fn store(mut self, store: S) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a storage backend that is also used elsewhere
    #[must_use]
    pub fn shared_store(mut self, store: Arc<S>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the catalog (required)
    #[must_use]
    pub fn catalog(mut self, catalog: C) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Take history capacity and page size from `config`
    #[must_use]
    pub fn config(mut self, config: HazsyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the `LookupSession`
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BuildError` if:
    /// - No store or no catalog was provided
    /// - The configuration holds zero sizes
    pub fn build(self) -> Result<LookupSession<S, C>, SessionError> {
        let store = self
            .store
            .ok_or_else(|| SessionError::BuildError("Storage backend is required".to_string()))?;
        let catalog = self
            .catalog
            .ok_or_else(|| SessionError::BuildError("Catalog is required".to_string()))?;
        self.config
            .validate()
            .map_err(|e| SessionError::BuildError(format!("Invalid configuration: {e}")))?;

        Ok(LookupSession {
            history: RecencyStore::with_capacity(Arc::clone(&store), self.config.history_capacity),
            bookmarks: SavedSet::new(store),
            controller: PagedQueryController::new(self.config.page_size),
            catalog,
        })
    }
}

impl<S: KeyValueStore, C: CatalogService> Default for LookupSessionBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}
