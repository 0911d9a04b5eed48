use crate::infrastructure::persistence::ServingStore;

/// State shared by the handlers outside the redirect chain.
#[derive(Clone)]
pub struct AppState {
    pub store: ServingStore,
}

impl AppState {
    pub fn new(store: ServingStore) -> Self {
        Self { store }
    }
}
