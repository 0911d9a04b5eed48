#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;
use urlshort::api::handlers::default_handler;
use urlshort::application::chain::{FailurePolicy, standard_chain};
use urlshort::infrastructure::persistence::{DEFAULT_SEED, PARTITION, ServingStore, seed};
use urlshort::infrastructure::resolvers::{ConfigParseError, DEFAULT_DOCUMENT};
use urlshort::routes::app_router;
use urlshort::state::AppState;

/// A seeded store living in a temporary directory.
///
/// The directory is removed when the fixture is dropped, so keep it alive for
/// as long as the server built on top of it.
pub struct StoreFixture {
    pub dir: TempDir,
    pub store: ServingStore,
}

pub fn seeded_store(entries: &[(&str, &str)]) -> StoreFixture {
    seeded_store_with_raw(entries, &[])
}

/// Like [`seeded_store`], but also writes `raw` values byte for byte, bypassing
/// the UTF-8 strings the writer accepts.
pub fn seeded_store_with_raw(entries: &[(&str, &str)], raw: &[(&str, &[u8])]) -> StoreFixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    seed(&path, DEFAULT_SEED).unwrap();
    seed(&path, entries).unwrap();

    if !raw.is_empty() {
        let db = sled::open(&path).unwrap();
        let tree = db.open_tree(PARTITION).unwrap();
        for (key, value) in raw {
            tree.insert(key.as_bytes(), *value).unwrap();
        }
        db.flush().unwrap();
    }

    let store = ServingStore::open(&path).unwrap();
    StoreFixture { dir, store }
}

pub fn create_app(
    store: &ServingStore,
    document: &[u8],
    policy: FailurePolicy,
) -> (Router, Option<ConfigParseError>) {
    let (chain, parse_error) = standard_chain(store.clone(), document, policy, default_handler());
    (app_router(AppState::new(store.clone()), chain), parse_error)
}

/// Full production chain over a store seeded with `entries` plus the default seed.
pub fn create_test_server(entries: &[(&str, &str)]) -> (TestServer, StoreFixture) {
    let fixture = seeded_store(entries);
    let (app, parse_error) = create_app(
        &fixture.store,
        DEFAULT_DOCUMENT.as_bytes(),
        FailurePolicy::PassThrough,
    );
    assert!(parse_error.is_none());

    (TestServer::new(app).unwrap(), fixture)
}
