//! Showtime - movie-ticket booking backend
//!
//! Browse shows by city, reserve a seat, pay for it and receive a ticket code,
//! or buy several seats at once through checkout. It showcases:
//!
//! - **Atomic seat sales**: a seat is sold at most once, however many users race for it
//! - **Read-through caching**: city listings cached for a fixed TTL, cleared on every sale
//! - **Injected environment**: clock, ticket codes and the current user are all capabilities
//!
//! # Architecture
//!
//! ```text
//!            HTTP (axum)
//!   ┌────────────┬────────────┬────────────┐
//!   │  Listings  │  Bookings  │  Accounts  │
//!   └─────┬──────┴─────┬──────┴─────┬──────┘
//!         │            │            │
//!  ┌──────▼──────┐ ┌───▼──────────┐ │
//!  │ ListingCache│◀┤BookingEngine │ │   clear_all on every sale
//!  └──────┬──────┘ └───┬──────────┘ │
//!  ┌──────▼──────┐     │            │
//!  │ListingQuery │     │            │
//!  └──────┬──────┘     │            │
//!         └────────────┼────────────┘
//!               ┌──────▼───────┐
//!               │ CatalogStore │  Postgres / in-memory
//!               └──────────────┘
//! ```
//!
//! # Seat Lifecycle
//!
//! ```text
//! free ──reserve──▶ pending booking(s) ──first pay──▶ sold (ticket issued)
//! free ──checkout─────────────────────────────────▶ sold (no ticket)
//! ```
//!
//! Selling is a conditional update inside one store transaction, so exactly
//! one of several concurrent buyers wins and the rest see "seat unavailable".
//!
//! # Usage
//!
//! See [`engine::BookingEngine`] for the booking operations and
//! [`server::build_router`] for the HTTP surface.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod accounts;
pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod listing;
pub mod metrics;
pub mod seed;
pub mod server;
pub mod session;

pub use cache::{CacheStatus, ListingCache};
pub use config::Config;
pub use engine::{BookingEngine, CheckoutConfirmation, CheckoutRequest};
pub use error::{AccountError, BookingError};
pub use listing::{ListingQuery, ShowSummary};
pub use server::{AppState, StateSettings, build_router};
