//! Application state for the booking HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - Catalog store (reads that bypass the engine: seat maps, locations, my bookings)
//! - Listing query and its cache
//! - Booking engine (reserve, pay, checkout)
//! - Account service and session store

use crate::accounts::AccountService;
use crate::cache::ListingCache;
use crate::engine::BookingEngine;
use crate::listing::ListingQuery;
use crate::session::SessionStore;
use axum::extract::FromRef;
use showtime_core::catalog::CatalogStore;
use showtime_core::environment::{Clock, TicketCodeGenerator};
use std::sync::Arc;
use std::time::Duration;

/// Tunables for [`AppState::new`].
#[derive(Clone, Copy, Debug)]
pub struct StateSettings {
    /// Listing cache entry lifetime
    pub listing_cache_ttl: Duration,
    /// Maximum locations held by the listing cache
    pub listing_cache_max_entries: usize,
    /// Maximum shows per city listing
    pub listing_max_results: usize,
    /// Session lifetime
    pub session_ttl: Duration,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            listing_cache_ttl: crate::cache::DEFAULT_TTL,
            listing_cache_max_entries: crate::cache::DEFAULT_MAX_ENTRIES,
            listing_max_results: crate::listing::DEFAULT_MAX_RESULTS,
            session_ttl: Duration::from_secs(86_400),
        }
    }
}

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Catalog storage
    pub store: Arc<dyn CatalogStore>,
    /// City listing query
    pub listing: ListingQuery,
    /// Listing cache shared by `/api/shows` and `/api/events`
    pub cache: Arc<ListingCache>,
    /// Reservation and payment engine
    pub engine: BookingEngine,
    /// Registration and login
    pub accounts: AccountService,
    /// Login sessions
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Wire every component around one store, clock and code generator.
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        clock: Arc<dyn Clock>,
        codes: Arc<dyn TicketCodeGenerator>,
        settings: StateSettings,
    ) -> Self {
        let cache = Arc::new(
            ListingCache::new(clock.clone(), settings.listing_cache_ttl)
                .with_max_entries(settings.listing_cache_max_entries),
        );
        Self {
            listing: ListingQuery::new(store.clone(), settings.listing_max_results),
            engine: BookingEngine::new(store.clone(), cache.clone(), clock.clone(), codes),
            accounts: AccountService::new(store.clone()),
            sessions: Arc::new(SessionStore::new(clock, settings.session_ttl)),
            cache,
            store,
        }
    }
}

// Lets the `SessionUser` extractor find the session store.
impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("listing", &self.listing)
            .field("cache", &self.cache)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
