//! Infrastructure layer: concrete resolvers and the storage they read from.
//!
//! # Modules
//!
//! - [`persistence`] - Embedded sled store
//! - [`resolvers`] - [`crate::domain::Resolver`] implementations

pub mod persistence;
pub mod resolvers;
