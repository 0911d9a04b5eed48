//! Embedded storage.
//!
//! - [`sled_store`] - sled-backed store: bootstrap seeding, the read-only
//!   serving handle and the read-write handle used by the admin CLI

pub mod sled_store;

pub use sled_store::{
    DEFAULT_SEED, PARTITION, ServingStore, StoreError, StoreResult, StoreWriter, seed,
};
