//! Resolver backed by the embedded store.

use crate::domain::{Resolution, Resolver};
use crate::infrastructure::persistence::ServingStore;
use async_trait::async_trait;
use tracing::{debug, error};

/// Resolves paths by reading the `PathsToURLs` partition of the serving store.
///
/// - Absent key or empty value: [`Resolution::NoMatch`]
/// - Read error or non-UTF-8 value: [`Resolution::Failure`]
///
/// Whether a failure passes through or surfaces as an error response is decided
/// by the chain's [`crate::application::chain::FailurePolicy`].
#[derive(Clone)]
pub struct StoreResolver {
    store: ServingStore,
}

impl StoreResolver {
    pub fn new(store: ServingStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Resolver for StoreResolver {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn resolve(&self, path: &str) -> Resolution {
        match self.store.get(path) {
            Ok(Some(destination)) if !destination.is_empty() => {
                debug!(resolver = "store", "{} -> {}", path, destination);
                Resolution::Match(destination)
            }
            Ok(_) => Resolution::NoMatch,
            Err(e) => {
                error!("Store read error for {}: {}", path, e);
                Resolution::Failure(e.to_string())
            }
        }
    }
}
