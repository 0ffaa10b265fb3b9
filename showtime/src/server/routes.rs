//! Router configuration for the booking server.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api;
use axum::{
    Router,
    routing::{get, post},
};
use showtime_web::correlation_id_layer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures:
/// - Health checks (`/health`, `/ready`)
/// - Listings and event cards (public)
/// - Accounts
/// - Booking, payment and checkout (session required)
///
/// Every request gets a correlation ID and an HTTP trace span.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Listings (public, cached)
        .route("/shows/:city", get(api::shows_by_city))
        .route("/events", get(api::list_events))
        .route("/events/:id", get(api::get_event))
        .route("/events/:id/seats", get(api::list_seats))
        .route("/locations", get(api::list_locations))
        // Accounts
        .route("/register", post(api::register))
        .route("/login", post(api::login))
        .route("/logout", post(api::logout))
        // Bookings (session required)
        .route("/book", post(api::book))
        .route("/pay/:booking_id", post(api::pay))
        .route("/checkout", post(api::checkout))
        .route("/my-bookings", get(api::my_bookings));

    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
