//! Top-level router.
//!
//! # Route Structure
//!
//! - `GET /health` - Store health check
//! - everything else - The redirect chain (store → YAML → static map → greeting)
//!
//! Only `GET` (and `HEAD`) on `/health` is claimed by the health route; other
//! methods on that path go through the chain like any other request.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging

use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::application::chain::RequestHandler;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router.
///
/// # Arguments
///
/// - `state` - shared state for the health handler
/// - `chain` - outermost link of the redirect chain; receives every request not
///   matched by a route, any method, unchanged
pub fn app_router(state: AppState, chain: RequestHandler) -> Router {
    Router::new()
        .route(
            "/health",
            get(health_handler).fallback_service(chain.clone()),
        )
        .fallback_service(chain)
        .with_state(state)
        .layer(tracing::layer())
}
