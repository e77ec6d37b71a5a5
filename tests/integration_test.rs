//! Integration tests for hazsync
//!
//! These tests verify end-to-end behaviour by opening stores on temporary
//! sled databases and driving searches against an in-process catalog.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use hazsync::query::{AggregationState, FilterValue, Phase};
use hazsync::{
    CatalogError, CatalogService, HazsyncConfig, Lookup, LookupSession, Outcome, Page,
    PagedQueryController, RecencyStore, RegistryNumber, SavedSet, SearchRequest, SledStore,
    Substance,
};

/// Helper function to open a store in a fresh temporary directory
fn setup_store() -> (SledStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = SledStore::open(dir.path().join("state")).unwrap();
    (store, dir)
}

fn keys_of<'a>(keys: impl IntoIterator<Item = &'a RegistryNumber>) -> Vec<u32> {
    keys.into_iter().map(|k| k.get()).collect()
}

/// Catalog serving a fixed list of substances, filtered by name substring
/// and paged like the real service
struct FixedCatalog {
    substances: Vec<Substance>,
    calls: Mutex<usize>,
}

impl FixedCatalog {
    fn with_count(count: u32) -> Self {
        Self {
            substances: (1..=count)
                .map(|n| Substance::new(1000 + n, format!("Substance {n}")))
                .collect(),
            calls: Mutex::new(0),
        }
    }
}

impl CatalogService for FixedCatalog {
    fn search(&self, request: &SearchRequest) -> Result<Page, CatalogError> {
        *self.calls.lock().unwrap() += 1;

        let matching: Vec<&Substance> = self
            .substances
            .iter()
            .filter(|s| {
                request
                    .search_term
                    .as_deref()
                    .is_none_or(|term| s.name.contains(term))
            })
            .collect();

        let size = request.page_size as usize;
        let start = request.page as usize * size;
        let records: Vec<Substance> = matching.iter().skip(start).take(size).map(|s| (*s).clone()).collect();
        let is_last_page = start + size >= matching.len();
        Ok(Page::new(records, is_last_page))
    }

    fn lookup(&self, by: &Lookup) -> Result<Substance, CatalogError> {
        match by {
            Lookup::RegistryNumber(key) => self
                .substances
                .iter()
                .find(|s| s.key() == *key)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(by.to_string())),
            _ => Err(CatalogError::NotFound(by.to_string())),
        }
    }
}

#[test]
fn test_history_evicts_beyond_capacity() {
    let (store, _dir) = setup_store();
    let history = RecencyStore::new(&store);

    for (key, name) in [(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E"), (6, "F")] {
        history.record(&Substance::new(key, name)).unwrap();
    }

    let names: Vec<String> = history.list().into_iter().map(|e| e.summary.name).collect();
    assert_eq!(names, vec!["F", "E", "D", "C", "B"]);
}

#[test]
fn test_history_revisit_promotes() {
    let (store, _dir) = setup_store();
    let history = RecencyStore::new(&store);

    history.record(&Substance::new(1, "A")).unwrap();
    history.record(&Substance::new(2, "B")).unwrap();
    history.record(&Substance::new(1, "A")).unwrap();

    let names: Vec<String> = history.list().into_iter().map(|e| e.summary.name).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_history_invariants_over_long_sequence() {
    let (store, _dir) = setup_store();
    let history = RecencyStore::new(&store);
    let mut last_seen: HashMap<u32, usize> = HashMap::new();

    // Deterministic pseudo-random view sequence over 9 keys
    let mut seed = 7u32;
    for step in 0..60 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let key = (seed >> 16) % 9 + 1;
        last_seen.insert(key, step);

        let list = history.record(&Substance::new(key, "x")).unwrap();
        let keys = keys_of(list.iter().map(|e| &e.summary.oon_number));

        assert!(keys.len() <= 5);
        assert_eq!(keys[0], key);
        let mut unique = keys.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), keys.len());
        // Ordered by most recent view
        let steps: Vec<usize> = keys.iter().map(|k| last_seen[k]).collect();
        assert!(steps.windows(2).all(|w| w[0] > w[1]));
    }
}

#[test]
fn test_bookmarks_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state");

    {
        let store = SledStore::open(&path).unwrap();
        let saved = SavedSet::new(&store);
        saved.add(&Substance::new(1005, "Ammonia")).unwrap();
        saved.add(&Substance::new(1017, "Chlorine")).unwrap();
        assert!(!saved.remove(RegistryNumber::new(9999)).unwrap());
    }

    let store = SledStore::open(&path).unwrap();
    let saved = SavedSet::new(&store);
    let keys = keys_of(saved.list().iter().map(|e| &e.substance.oon_number));
    assert_eq!(keys, vec![1017, 1005]);
    assert!(saved.contains(RegistryNumber::new(1005)));
}

#[test]
fn test_history_and_bookmarks_share_a_store_independently() {
    let (store, _dir) = setup_store();
    let history = RecencyStore::new(&store);
    let saved = SavedSet::new(&store);

    history.record(&Substance::new(1, "A")).unwrap();
    saved.add(&Substance::new(2, "B")).unwrap();
    history.clear().unwrap();

    assert!(history.list().is_empty());
    assert!(saved.contains(RegistryNumber::new(2)));
}

#[test]
fn test_session_paginates_to_the_end() {
    let (store, _dir) = setup_store();
    let mut session = LookupSession::builder()
        .store(store)
        .catalog(FixedCatalog::with_count(12))
        .build()
        .unwrap();

    session.refresh().unwrap();
    let mut pages = 1;
    while let Some(outcome) = session.load_more().unwrap() {
        assert!(matches!(outcome, Outcome::Applied { .. }));
        pages += 1;
    }

    assert_eq!(pages, 3);
    assert_eq!(session.controller().records().len(), 12);
    assert!(!session.controller().more_pages());
    assert_eq!(*session.catalog().calls.lock().unwrap(), 3);
}

#[test]
fn test_session_search_with_no_results() {
    let (store, _dir) = setup_store();
    let mut session = LookupSession::builder()
        .store(store)
        .catalog(FixedCatalog::with_count(12))
        .build()
        .unwrap();

    let outcome = session.set_search_term("no such substance").unwrap();

    assert_eq!(outcome, Outcome::Applied { page: 0, appended: 0 });
    assert!(session.controller().records().is_empty());
    assert_eq!(session.load_more().unwrap(), None);
}

#[test]
fn test_session_config_sizes() {
    let (store, dir) = setup_store();
    let config = HazsyncConfig {
        database_path: Some(dir.path().join("unused")),
        history_capacity: 3,
        page_size: 10,
        catalog_url: None,
    };
    let mut session = LookupSession::builder()
        .store(store)
        .catalog(FixedCatalog::with_count(12))
        .config(config)
        .build()
        .unwrap();

    session.refresh().unwrap();
    assert_eq!(session.controller().records().len(), 10);

    for record in session.controller().records().to_vec() {
        session.select(&record).unwrap();
    }
    assert_eq!(session.history().list().len(), 3);
}

#[test]
fn test_lookup_then_bookmark_flow() {
    let (store, _dir) = setup_store();
    let session = LookupSession::builder()
        .store(store)
        .catalog(FixedCatalog::with_count(3))
        .build()
        .unwrap();

    let found = session
        .lookup(&Lookup::RegistryNumber(RegistryNumber::new(1002)))
        .unwrap();
    assert!(session.toggle_bookmark(&found).unwrap());

    assert_eq!(session.history().list()[0].key(), RegistryNumber::new(1002));
    assert!(session.is_bookmarked(RegistryNumber::new(1002)));
}

#[test]
fn test_out_of_order_responses_from_worker_threads() {
    let catalog = Arc::new(FixedCatalog::with_count(12));
    let mut controller = PagedQueryController::new(5);

    let liquid = controller.set_filter(FilterValue::AggregationState(AggregationState::Liquid));
    let solid = controller.set_filter(FilterValue::AggregationState(AggregationState::Solid));

    // Execute both requests off-thread; the newer one reports back first
    let (tx, rx) = mpsc::channel();
    for ticket in [solid, liquid] {
        let catalog = Arc::clone(&catalog);
        let tx = tx.clone();
        thread::spawn(move || {
            let result = catalog.search(ticket.request());
            tx.send((ticket, result)).unwrap();
        })
        .join()
        .unwrap();
    }
    drop(tx);

    let outcomes: Vec<Outcome> = rx
        .iter()
        .map(|(ticket, result)| controller.complete(ticket, result).unwrap())
        .collect();

    assert!(matches!(outcomes[0], Outcome::Applied { page: 0, .. }));
    assert_eq!(outcomes[1], Outcome::Discarded);
    assert_eq!(controller.records().len(), 5);
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(
        controller.filters().get(hazsync::query::FilterDimension::AggregationState),
        Some(&FilterValue::AggregationState(AggregationState::Solid))
    );
}
