//! Show listings by city.
//!
//! The listing query joins each show with its theater and derives the
//! presentation fields (description, image, date and time labels) that both
//! the show list and the event cards render.

use chrono::{DateTime, Utc};
use showtime_core::catalog::{CatalogError, CatalogStore};
use showtime_core::types::{Price, Show, ShowId, Theater};
use std::sync::Arc;

/// Image shown for every event card.
pub const PLACEHOLDER_IMAGE: &str = "/static/event_default.jpg";

/// Default cap on shows per city listing.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A show joined with its theater.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShowSummary {
    /// Show id
    pub show_id: ShowId,
    /// Movie title
    pub title: String,
    /// Theater name
    pub theater: String,
    /// Theater city
    pub city: String,
    /// Theater street address
    pub address: String,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// Ticket price
    pub price: Price,
}

impl ShowSummary {
    /// Join a show with its theater.
    #[must_use]
    pub fn new(show: Show, theater: Theater) -> Self {
        Self {
            show_id: show.id,
            title: show.name,
            theater: theater.name,
            city: theater.city,
            address: theater.address,
            start_time: show.start_time,
            price: show.price,
        }
    }

    /// `At {theater}, {city}`
    #[must_use]
    pub fn description(&self) -> String {
        format!("At {}, {}", self.theater, self.city)
    }

    /// Event card image.
    #[must_use]
    pub const fn image(&self) -> &'static str {
        PLACEHOLDER_IMAGE
    }

    /// Start date as `%Y-%m-%d`.
    #[must_use]
    pub fn date_label(&self) -> String {
        self.start_time.format("%Y-%m-%d").to_string()
    }

    /// Start time as `%Y-%m-%d %H:%M`.
    #[must_use]
    pub fn time_label(&self) -> String {
        self.start_time.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Read-side query over the catalog.
#[derive(Clone)]
pub struct ListingQuery {
    store: Arc<dyn CatalogStore>,
    max_results: usize,
}

impl ListingQuery {
    /// Create a query capped at `max_results` shows per city.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, max_results: usize) -> Self {
        Self { store, max_results }
    }

    /// Shows at theaters in `city`, ordered by show id.
    ///
    /// # Errors
    ///
    /// Propagates catalog failures.
    pub async fn list_shows_by_city(&self, city: &str) -> Result<Vec<ShowSummary>, CatalogError> {
        let rows = self
            .store
            .list_shows_by_theater_city(city, self.max_results)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(show, theater)| ShowSummary::new(show, theater))
            .collect())
    }

    /// A single show with its theater, uncached.
    ///
    /// # Errors
    ///
    /// Propagates catalog failures. A show whose theater is missing is reported
    /// as [`CatalogError::Corrupt`].
    pub async fn show_detail(&self, show_id: ShowId) -> Result<Option<ShowSummary>, CatalogError> {
        let Some(show) = self.store.get_show(show_id).await? else {
            return Ok(None);
        };
        let theater = self.store.get_theater(show.theater_id).await?.ok_or_else(|| {
            CatalogError::Corrupt(format!("show {show_id} references missing theater"))
        })?;
        Ok(Some(ShowSummary::new(show, theater)))
    }
}

impl std::fmt::Debug for ListingQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingQuery")
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}
