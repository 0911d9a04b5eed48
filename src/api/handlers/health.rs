//! Handler for health check endpoint.

use axum::{Json, extract::State};
use serde_json::json;

use crate::api::dto::health::{StoreCheck, HealthChecks, HealthResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store readable
/// - **503 Service Unavailable**: Store probe failed; the health report is
///   returned in the error `details`
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": {
///       "status": "ok",
///       "message": "PathsToURLs readable at url-shortener.db"
///     }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let store_check = check_store(&state);
    let healthy = store_check.is_ok();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks { store: store_check },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err(AppError::unavailable(
            "Service degraded",
            serde_json::to_value(&response).unwrap_or_else(|_| json!({})),
        ))
    }
}

/// Probes the serving store with a single point read; never scans the tree.
fn check_store(state: &AppState) -> StoreCheck {
    if state.store.health_check() {
        StoreCheck {
            status: "ok",
            message: Some(format!("PathsToURLs readable at {}", state.store.path().display())),
        }
    } else {
        StoreCheck {
            status: "error",
            message: Some("Store read failed".to_string()),
        }
    }
}
