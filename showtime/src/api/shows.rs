//! City show listing.
//!
//! - GET /api/shows/:city - Shows in a city, served through the listing cache

use crate::cache::CacheStatus;
use crate::error::catalog_failure;
use crate::listing::ShowSummary;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;
use showtime_core::types::ShowId;
use showtime_web::{ApiPath, AppError};

/// One row of the city listing.
#[derive(Debug, Serialize)]
pub struct ShowRow {
    /// Show id
    pub show_id: ShowId,
    /// Movie title
    pub name: String,
    /// Theater name
    pub theater: String,
    /// Start time, `%Y-%m-%d %H:%M`
    pub time: String,
    /// Ticket price
    pub price: i64,
}

impl From<&ShowSummary> for ShowRow {
    fn from(show: &ShowSummary) -> Self {
        Self {
            show_id: show.show_id,
            name: show.title.clone(),
            theater: show.theater.clone(),
            time: show.time_label(),
            price: show.price.amount(),
        }
    }
}

/// City listing response.
#[derive(Debug, Serialize)]
pub struct ShowsResponse {
    /// `HIT` or `MISS`
    pub cache: CacheStatus,
    /// Shows, ordered by id
    pub data: Vec<ShowRow>,
}

/// List shows in a city.
///
/// Public endpoint - no authentication required. Empty results are cached
/// like any other.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/shows/Chennai
/// ```
///
/// Response:
/// ```json
/// {
///   "cache": "MISS",
///   "data": [
///     {"show_id": 1, "name": "Coolie", "theater": "Majestic", "time": "2025-01-02 18:30", "price": 200}
///   ]
/// }
/// ```
pub async fn shows_by_city(
    ApiPath(city): ApiPath<String>,
    State(state): State<AppState>,
) -> Result<Json<ShowsResponse>, AppError> {
    let listing = state
        .cache
        .get_or_compute(&city, || state.listing.list_shows_by_city(&city))
        .await
        .map_err(catalog_failure)?;

    Ok(Json(ShowsResponse {
        cache: listing.status,
        data: listing.shows.iter().map(ShowRow::from).collect(),
    }))
}
