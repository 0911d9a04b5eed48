//! HTTP error responses produced by the service itself.
//!
//! Resolution problems never reach end users as errors unless the store failure
//! policy asks for it; these variants cover that case and the health probe.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    BadGateway { message: String, details: Value },
    Unavailable { message: String, details: Value },
}

impl AppError {
    pub fn bad_gateway(message: impl Into<String>, details: Value) -> Self {
        Self::BadGateway {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::BadGateway { message, details } => {
                (StatusCode::BAD_GATEWAY, "bad_gateway", message, details)
            }
            AppError::Unavailable { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
