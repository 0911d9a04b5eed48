//! Terminal handler at the end of the redirect chain.

use crate::application::chain::RequestHandler;
use axum::Router;

/// Body served when no redirect source knows the requested path.
pub const GREETING: &str = "Hello, world!";

/// Answers `200 OK` with [`GREETING`] for any method and path.
pub async fn greeting_handler() -> &'static str {
    GREETING
}

/// The chain's terminal handler, serving [`greeting_handler`] for every request.
pub fn default_handler() -> RequestHandler {
    RequestHandler::new(Router::new().fallback(greeting_handler))
}
