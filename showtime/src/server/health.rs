//! Health check endpoints for the booking server.
//!
//! `/health` is a liveness probe that never touches dependencies.
//! `/ready` makes one catalog round trip.

use super::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use showtime_web::handlers::health::ReadinessResponse;
use showtime_web::handlers::readiness;

pub use showtime_web::handlers::health_check;

/// Readiness check endpoint.
///
/// Returns 503 when the catalog store cannot be reached.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"ready":true,"database":"ok"}
/// ```
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let database_ok = match state.store.count_theaters().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            false
        }
    };
    readiness(database_ok)
}
