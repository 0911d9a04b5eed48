//! HTTP layer around the redirect chain.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - Health check and the chain's terminal greeting handler
//! - [`middleware`] - Request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
