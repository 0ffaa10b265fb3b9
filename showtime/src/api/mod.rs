//! API endpoints for the booking server.
//!
//! Handlers are organized by domain:
//! - Shows: city listing (cached)
//! - Events: event cards, seat maps, locations
//! - Bookings: reserve, pay, checkout, booking history
//! - Accounts: register, login, logout

pub mod accounts;
pub mod bookings;
pub mod events;
pub mod shows;

pub use accounts::{login, logout, register};
pub use bookings::{book, checkout, my_bookings, pay};
pub use events::{get_event, list_events, list_locations, list_seats};
pub use shows::shows_by_city;
