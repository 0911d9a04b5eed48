//! HTTP middleware.

pub mod tracing;
