//! HTTP request handlers shared by every Showtime service.

pub mod health;

pub use health::{health_check, readiness};
