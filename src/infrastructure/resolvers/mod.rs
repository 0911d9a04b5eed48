//! Concrete redirect sources.
//!
//! - [`StaticMapResolver`] - In-memory mapping fixed at construction
//! - [`yaml`] - Declarative YAML records folded into a [`StaticMapResolver`]
//! - [`StoreResolver`] - Reads from the embedded sled store

pub mod static_map;
pub mod store;
pub mod yaml;

pub use static_map::{DEFAULT_PATHS, StaticMapResolver};
pub use store::StoreResolver;
pub use yaml::{
    ConfigParseError, DEFAULT_DOCUMENT, load_document, parse_records, serialize_records,
    yaml_resolver,
};
