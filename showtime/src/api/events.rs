//! Event card endpoints.
//!
//! An "event" is a show rendered as a card for the browsing UI:
//! - GET /api/events?location=City - Event cards for a city (cached, same entries as `/api/shows`)
//! - GET /api/events/:id - A single event card (uncached)
//! - GET /api/events/:id/seats - Seat map of the show
//! - GET /api/locations - Cities that have at least one theater

use crate::cache::CacheStatus;
use crate::error::catalog_failure;
use crate::listing::ShowSummary;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use showtime_core::types::{SeatId, ShowId};
use showtime_web::{ApiPath, ApiQuery, AppError};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the event listing.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// City to list
    pub location: Option<String>,
}

/// Event card.
#[derive(Debug, Serialize)]
pub struct EventCard {
    /// Show id
    pub id: ShowId,
    /// Movie title
    pub title: String,
    /// `At {theater}, {city}`
    pub description: String,
    /// Card image path
    pub image: &'static str,
    /// Start date, `%Y-%m-%d`
    pub date: String,
    /// Theater street address
    pub location: String,
}

impl From<&ShowSummary> for EventCard {
    fn from(show: &ShowSummary) -> Self {
        Self {
            id: show.show_id,
            title: show.title.clone(),
            description: show.description(),
            image: show.image(),
            date: show.date_label(),
            location: show.address.clone(),
        }
    }
}

/// Event listing response.
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    /// The city listed
    pub location: String,
    /// `HIT` or `MISS`
    pub cache: CacheStatus,
    /// Event cards, ordered by show id
    pub events: Vec<EventCard>,
}

/// One seat of the seat map.
#[derive(Debug, Serialize)]
pub struct SeatView {
    /// Seat id
    pub seat_id: SeatId,
    /// Seat label, e.g. `A1`
    pub seat_number: String,
    /// Whether the seat is sold
    pub booked: bool,
}

/// Location list response.
#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    /// Distinct theater cities, sorted
    pub locations: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List event cards for a city.
///
/// Public endpoint - no authentication required.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/api/events?location=Chennai"
/// ```
pub async fn list_events(
    ApiQuery(query): ApiQuery<EventsQuery>,
    State(state): State<AppState>,
) -> Result<Json<EventsResponse>, AppError> {
    let location = query
        .location
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("location is required"))?;

    let listing = state
        .cache
        .get_or_compute(&location, || state.listing.list_shows_by_city(&location))
        .await
        .map_err(catalog_failure)?;

    Ok(Json(EventsResponse {
        cache: listing.status,
        events: listing.shows.iter().map(EventCard::from).collect(),
        location,
    }))
}

/// Get a single event card.
///
/// Public endpoint - no authentication required.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/events/1
/// ```
pub async fn get_event(
    ApiPath(show_id): ApiPath<i64>,
    State(state): State<AppState>,
) -> Result<Json<EventCard>, AppError> {
    let show_id = ShowId::new(show_id);
    let show = state
        .listing
        .show_detail(show_id)
        .await
        .map_err(catalog_failure)?
        .ok_or_else(|| AppError::not_found("show not found"))?;

    Ok(Json(EventCard::from(&show)))
}

/// Seat map of a show.
///
/// Public endpoint - no authentication required.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/events/1/seats
/// ```
pub async fn list_seats(
    ApiPath(show_id): ApiPath<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<SeatView>>, AppError> {
    let show_id = ShowId::new(show_id);
    if state
        .store
        .get_show(show_id)
        .await
        .map_err(catalog_failure)?
        .is_none()
    {
        return Err(AppError::not_found("show not found"));
    }

    let seats = state
        .store
        .list_seats(show_id)
        .await
        .map_err(catalog_failure)?;

    Ok(Json(
        seats
            .into_iter()
            .map(|seat| SeatView {
                seat_id: seat.id,
                seat_number: seat.seat_number,
                booked: seat.is_booked,
            })
            .collect(),
    ))
}

/// List the cities with theaters.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/locations
/// # {"locations":["Bangalore","Chennai","Delhi","Hyderabad","Mumbai"]}
/// ```
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<LocationsResponse>, AppError> {
    let locations = state.store.list_cities().await.map_err(catalog_failure)?;
    Ok(Json(LocationsResponse { locations }))
}
