//! Application layer: composing resolvers into the request pipeline.
//!
//! - [`chain`] - Resolver layers, failure policy and chain construction

pub mod chain;
