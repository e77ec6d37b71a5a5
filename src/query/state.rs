//! Observable query state
//!
//! Only `PagedQueryController` mutates a `QueryState`; everything here is
//! read access for the UI layer.

use super::filters::Filters;
use crate::record::Substance;

/// Monotonically increasing tag identifying one set of search criteria
///
/// Every criteria change or refresh starts a new generation. A response is
/// applied only if it was issued under the current generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Why a fetch was issued
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchKind {
    /// First page after a criteria change or refresh; replaces the buffer
    Reset,
    /// Next page; appends to the buffer
    LoadMore,
}

/// What the controller is doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching { page: u32, kind: FetchKind },
}

/// The single fetch the controller is waiting for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) generation: Generation,
    pub(crate) page: u32,
    pub(crate) kind: FetchKind,
}

/// Search criteria, pagination cursor and accumulated results
#[derive(Clone, Debug, Default)]
pub struct QueryState {
    pub(crate) search_term: Option<String>,
    pub(crate) filters: Filters,
    pub(crate) page: u32,
    pub(crate) records: Vec<Substance>,
    pub(crate) more_pages: bool,
    pub(crate) in_flight: Option<InFlight>,
}

impl QueryState {
    /// Trimmed free-text term, `None` when no term is set
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Index of the last page applied to the buffer
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Accumulated results across all applied pages
    #[must_use]
    pub fn records(&self) -> &[Substance] {
        &self.records
    }

    /// Whether the catalog reported further pages for the current criteria
    #[must_use]
    pub const fn more_pages(&self) -> bool {
        self.more_pages
    }

    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self.in_flight {
            Some(in_flight) => Phase::Fetching {
                page: in_flight.page,
                kind: in_flight.kind,
            },
            None => Phase::Idle,
        }
    }
}
