//! Paged, filterable search driven by explicit fetch tickets
//!
//! The controller never performs I/O itself. Every operation that needs data
//! returns a [`FetchTicket`]; the caller sends `ticket.request()` to a
//! catalog however it likes and hands the result back to
//! [`PagedQueryController::complete`]. [`PagedQueryController::run`] does both
//! steps synchronously.
//!
//! Each ticket is stamped with the generation active when it was issued.
//! Criteria changes and refreshes start a new generation, so a response for
//! old criteria that arrives late is dropped instead of overwriting results
//! for the new ones.

use std::fmt;
use tracing::{debug, warn};

use super::error::QueryError;
use super::filters::{FilterDimension, FilterValue, Filters};
use super::state::{FetchKind, Generation, InFlight, Phase, QueryState};
use crate::catalog::{CatalogError, CatalogService, Page, SearchRequest};
use crate::record::Substance;

/// Results requested per page when no size is configured
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// A fetch the caller must execute and report back
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a ticket must be completed or the controller stays in the fetching phase"]
pub struct FetchTicket {
    generation: Generation,
    page: u32,
    kind: FetchKind,
    request: SearchRequest,
}

impl FetchTicket {
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn kind(&self) -> FetchKind {
        self.kind
    }

    /// The catalog request to execute
    #[must_use]
    pub const fn request(&self) -> &SearchRequest {
        &self.request
    }

    const fn slot(&self) -> InFlight {
        InFlight {
            generation: self.generation,
            page: self.page,
            kind: self.kind,
        }
    }
}

/// Result of completing a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The page was applied to the buffer
    Applied { page: u32, appended: usize },
    /// The ticket was superseded; nothing changed
    Discarded,
}

/// State changes reported to observers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryEvent {
    /// The buffer was cleared for new criteria or a refresh
    Reset { generation: Generation },
    /// A fetched page was applied
    PageApplied {
        page: u32,
        appended: usize,
        more_pages: bool,
    },
    /// A fetch failed; the buffer was not extended
    FetchFailed(QueryError),
}

/// Receives `QueryEvent`s; implemented for any `FnMut(&QueryEvent)`
pub trait QueryObserver {
    fn on_event(&mut self, event: &QueryEvent);
}

impl<F: FnMut(&QueryEvent)> QueryObserver for F {
    fn on_event(&mut self, event: &QueryEvent) {
        self(event);
    }
}

/// Owns search criteria, the page cursor, the result buffer and the
/// single in-flight fetch
pub struct PagedQueryController {
    state: QueryState,
    generation: Generation,
    page_size: u32,
    last_error: Option<QueryError>,
    observers: Vec<Box<dyn QueryObserver + Send>>,
}

impl PagedQueryController {
    /// Create an idle controller with no criteria and an empty buffer
    ///
    /// `more_pages` starts out false, so `load_more` does nothing until a
    /// first page has been applied. A zero `page_size` is raised to one.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            state: QueryState::default(),
            generation: Generation::default(),
            page_size: page_size.max(1),
            last_error: None,
            observers: Vec::new(),
        }
    }

    /// Register an observer for subsequent events
    pub fn subscribe(&mut self, observer: impl QueryObserver + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace the search term and restart from page 0
    ///
    /// The term is trimmed; an empty term searches without one.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> FetchTicket {
        let term = term.into();
        let term = term.trim();
        self.state.search_term = (!term.is_empty()).then(|| term.to_string());
        self.reset()
    }

    /// Select a filter value and restart from page 0
    pub fn set_filter(&mut self, value: FilterValue) -> FetchTicket {
        self.state.filters.set(value);
        self.reset()
    }

    /// Unset one filter dimension and restart from page 0
    pub fn clear_filter(&mut self, dimension: FilterDimension) -> FetchTicket {
        self.state.filters.clear(dimension);
        self.reset()
    }

    /// Unset every filter and restart from page 0
    pub fn clear_filters(&mut self) -> FetchTicket {
        self.state.filters.clear_all();
        self.reset()
    }

    /// Reload page 0 for the current criteria
    pub fn refresh(&mut self) -> FetchTicket {
        self.reset()
    }

    /// Request the page after the last applied one
    ///
    /// Returns `None`, changing nothing, while a fetch is in flight or when
    /// the catalog reported no further pages.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.state.is_fetching() || !self.state.more_pages {
            debug!(
                fetching = self.state.is_fetching(),
                more_pages = self.state.more_pages,
                "load more suppressed"
            );
            return None;
        }

        let page = self.state.page.saturating_add(1);
        Some(self.issue(page, FetchKind::LoadMore))
    }

    /// Apply the result of a ticket's fetch
    ///
    /// A ticket from an earlier generation, or one that is no longer the
    /// in-flight fetch, is discarded without any state change or event.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Network` when `result` is a failure for the
    /// current fetch. The buffer is left untouched (a reset fetch already
    /// cleared it) and a load-more can be retried for the same page.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page, CatalogError>,
    ) -> Result<Outcome, QueryError> {
        if ticket.generation != self.generation || self.state.in_flight != Some(ticket.slot()) {
            debug!(
                ticket_generation = ticket.generation.get(),
                generation = self.generation.get(),
                page = ticket.page,
                "discarding stale response"
            );
            return Ok(Outcome::Discarded);
        }

        self.state.in_flight = None;

        match result {
            Ok(page) => {
                let appended = page.records.len();
                match ticket.kind {
                    FetchKind::Reset => self.state.records = page.records,
                    FetchKind::LoadMore => self.state.records.extend(page.records),
                }
                self.state.page = ticket.page;
                self.state.more_pages = !page.is_last_page;
                self.last_error = None;

                debug!(
                    generation = ticket.generation.get(),
                    page = ticket.page,
                    appended,
                    len = self.state.records.len(),
                    more_pages = self.state.more_pages,
                    "applied page"
                );
                self.emit(&QueryEvent::PageApplied {
                    page: ticket.page,
                    appended,
                    more_pages: self.state.more_pages,
                });
                Ok(Outcome::Applied {
                    page: ticket.page,
                    appended,
                })
            }
            Err(source) => {
                if ticket.kind == FetchKind::Reset {
                    // Nothing to continue from until a reset succeeds
                    self.state.more_pages = false;
                }
                let error = QueryError::Network {
                    page: ticket.page,
                    source,
                };
                warn!(page = ticket.page, error = %error, "fetch failed");
                self.last_error = Some(error.clone());
                self.emit(&QueryEvent::FetchFailed(error.clone()));
                Err(error)
            }
        }
    }

    /// Execute `ticket` against `catalog` and apply the result
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Network` if the catalog call fails.
    pub fn run<C: CatalogService + ?Sized>(
        &mut self,
        catalog: &C,
        ticket: FetchTicket,
    ) -> Result<Outcome, QueryError> {
        let result = catalog.search(ticket.request());
        self.complete(ticket, result)
    }

    #[must_use]
    pub const fn state(&self) -> &QueryState {
        &self.state
    }

    #[must_use]
    pub fn records(&self) -> &[Substance] {
        self.state.records()
    }

    #[must_use]
    pub const fn more_pages(&self) -> bool {
        self.state.more_pages()
    }

    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.state.is_fetching()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.state.page()
    }

    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.state.search_term()
    }

    #[must_use]
    pub const fn filters(&self) -> &Filters {
        self.state.filters()
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Error from the most recent failed fetch, cleared by the next reset or
    /// successful page
    #[must_use]
    pub const fn last_error(&self) -> Option<&QueryError> {
        self.last_error.as_ref()
    }

    fn reset(&mut self) -> FetchTicket {
        self.generation = self.generation.next();
        self.state.page = 0;
        self.state.records.clear();
        self.state.more_pages = false;
        self.last_error = None;
        self.emit(&QueryEvent::Reset {
            generation: self.generation,
        });
        self.issue(0, FetchKind::Reset)
    }

    fn issue(&mut self, page: u32, kind: FetchKind) -> FetchTicket {
        let ticket = FetchTicket {
            generation: self.generation,
            page,
            kind,
            request: SearchRequest {
                search_term: self.state.search_term.clone(),
                filters: self.state.filters.clone(),
                page,
                page_size: self.page_size,
            },
        };
        self.state.in_flight = Some(ticket.slot());
        debug!(generation = self.generation.get(), page, ?kind, "issued fetch");
        ticket
    }

    fn emit(&mut self, event: &QueryEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }
}

impl Default for PagedQueryController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl fmt::Debug for PagedQueryController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedQueryController")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("page_size", &self.page_size)
            .field("last_error", &self.last_error)
            .field("observers", &self.observers.len())
            .finish()
    }
}
