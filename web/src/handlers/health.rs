//! Health check endpoints.
//!
//! Liveness (`/health`) never touches dependencies. Readiness (`/ready`) is
//! assembled by the application from a database probe and rendered here.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Liveness response body.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is serving
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Simple health check endpoint (for basic liveness).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "version": "0.1.0" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness response body.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ReadinessResponse {
    /// Whether the service can take traffic
    pub ready: bool,
    /// `"ok"` or `"unavailable"`
    pub database: &'static str,
}

/// Render a readiness probe result.
///
/// # Status Codes
///
/// - 200 OK: database reachable
/// - 503 Service Unavailable: database probe failed
#[must_use]
pub fn readiness(database_ok: bool) -> (StatusCode, Json<ReadinessResponse>) {
    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready: database_ok,
            database: if database_ok { "ok" } else { "unavailable" },
        }),
    )
}
