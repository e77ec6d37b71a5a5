//! Remote substance catalog contract
//!
//! The catalog itself is an external service; this module only defines what
//! the rest of the crate needs from it and how its page envelope is decoded.
//! Transport (HTTP client, timeouts, retries) belongs to implementations of
//! [`CatalogService`].

use serde::Deserialize;
use std::fmt;

use crate::query::Filters;
use crate::record::{RegistryNumber, Substance};

pub mod error;

pub use error::CatalogError;

/// Operations the crate needs from the remote catalog
pub trait CatalogService {
    /// Fetch one page of substances matching `request`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the response is invalid.
    fn search(&self, request: &SearchRequest) -> Result<Page, CatalogError>;

    /// Fetch a single substance
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if nothing matches, or another
    /// variant if the request fails.
    fn lookup(&self, by: &Lookup) -> Result<Substance, CatalogError>;
}

impl<C: CatalogService + ?Sized> CatalogService for &C {
    fn search(&self, request: &SearchRequest) -> Result<Page, CatalogError> {
        (**self).search(request)
    }

    fn lookup(&self, by: &Lookup) -> Result<Substance, CatalogError> {
        (**self).lookup(by)
    }
}

impl<C: CatalogService + ?Sized> CatalogService for Box<C> {
    fn search(&self, request: &SearchRequest) -> Result<Page, CatalogError> {
        (**self).search(request)
    }

    fn lookup(&self, by: &Lookup) -> Result<Substance, CatalogError> {
        (**self).lookup(by)
    }
}

/// One paged search against the catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub search_term: Option<String>,
    pub filters: Filters,
    /// Zero-based page index
    pub page: u32,
    pub page_size: u32,
}

impl SearchRequest {
    /// Query parameters in the order the catalog documents them
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.page_size.to_string()),
        ];
        if let Some(term) = &self.search_term {
            params.push(("search", term.clone()));
        }
        params.extend(self.filters.params());
        params
    }
}

/// A page of search results
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub records: Vec<Substance>,
    /// Set by the catalog on the final page
    pub is_last_page: bool,
}

impl Page {
    #[must_use]
    pub const fn new(records: Vec<Substance>, is_last_page: bool) -> Self {
        Self {
            records,
            is_last_page,
        }
    }

    /// Decode the catalog's page envelope `{ "content": [...], "last": bool }`
    ///
    /// Missing `content` decodes as an empty page. Missing `last` is taken as
    /// the final page.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Decode` if the body is not a valid envelope.
    pub fn from_json(body: &[u8]) -> Result<Self, CatalogError> {
        let envelope: PageEnvelope = serde_json::from_slice(body)?;
        Ok(Self {
            records: envelope.content.unwrap_or_default(),
            is_last_page: envelope.last.unwrap_or(true),
        })
    }
}

#[derive(Deserialize)]
struct PageEnvelope {
    #[serde(default)]
    content: Option<Vec<Substance>>,
    #[serde(default)]
    last: Option<bool>,
}

/// Point-lookup modes offered by the catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// By UN registry number, the record key
    RegistryNumber(RegistryNumber),
    Name(String),
    /// By HAZ (Hazchem) code
    Haz(String),
    Imdg(String),
    Formula(String),
}

impl Lookup {
    /// Reject blank text lookups before they reach the network
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidQuery` for an empty or whitespace query.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let text = match self {
            Self::RegistryNumber(_) => return Ok(()),
            Self::Name(text) | Self::Haz(text) | Self::Imdg(text) | Self::Formula(text) => text,
        };
        if text.trim().is_empty() {
            return Err(CatalogError::InvalidQuery(format!("empty {} query", self.kind())));
        }
        Ok(())
    }

    /// Short name of the lookup mode
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RegistryNumber(_) => "registry number",
            Self::Name(_) => "name",
            Self::Haz(_) => "HAZ code",
            Self::Imdg(_) => "IMDG code",
            Self::Formula(_) => "formula",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistryNumber(number) => write!(f, "{} {number}", self.kind()),
            Self::Name(text) | Self::Haz(text) | Self::Imdg(text) | Self::Formula(text) => {
                write!(f, "{} '{}'", self.kind(), text.trim())
            }
        }
    }
}
