//! # urlshort
//!
//! A path-to-URL redirect service built with Axum and sled.
//!
//! Every request path is offered to an ordered chain of redirect sources; the
//! first source with a mapping answers `302 Found`, and a request no source
//! knows falls through to a plain `200 Hello, world!`.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The [`domain::Resolver`] capability and path records
//! - **Infrastructure Layer** ([`infrastructure`]) - Static map, YAML and sled-store resolvers
//! - **Application Layer** ([`application`]) - Tower layers folding resolvers into a chain
//! - **API Layer** ([`api`]) - Health check, terminal handler and tracing middleware
//!
//! ## Chain
//!
//! ```text
//! store (sled "PathsToURLs") -> YAML document -> static map -> Hello, world!
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export STORE_PATH="url-shortener.db"
//! cargo run
//! curl -i http://localhost:8080/urlshort-bolt
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::chain::{
        FailurePolicy, RequestHandler, build_chain, map_handler, standard_chain, store_handler,
        yaml_handler,
    };
    pub use crate::domain::entities::PathRecord;
    pub use crate::domain::{Resolution, Resolver};
    pub use crate::infrastructure::persistence::{ServingStore, StoreError, StoreWriter, seed};
    pub use crate::infrastructure::resolvers::{
        ConfigParseError, StaticMapResolver, StoreResolver,
    };
    pub use crate::state::AppState;
}
