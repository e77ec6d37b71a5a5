//! Paged catalog search
//!
//! Provides `PagedQueryController`, which owns the search criteria, the page
//! cursor, the accumulated result buffer and the single in-flight fetch, and
//! guarantees that responses for superseded criteria are never applied.

pub mod controller;
pub mod error;
pub mod filters;
pub mod state;

pub use controller::{
    DEFAULT_PAGE_SIZE, FetchTicket, Outcome, PagedQueryController, QueryEvent, QueryObserver,
};
pub use error::QueryError;
pub use filters::{
    AggregationState, DensityAir, DensityWater, FilterDimension, FilterValue, Filters,
    GeneralDanger, Solubility, WaterDanger,
};
pub use state::{FetchKind, Generation, Phase, QueryState};
