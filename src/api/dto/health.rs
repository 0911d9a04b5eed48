//! Body of `GET /health`.

use serde::Serialize;

/// `healthy` when the store answered the probe, `degraded` otherwise.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: StoreCheck,
}

/// Outcome of the point read against the `PathsToURLs` tree.
#[derive(Debug, Serialize)]
pub struct StoreCheck {
    /// `ok` or `error`.
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StoreCheck {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
