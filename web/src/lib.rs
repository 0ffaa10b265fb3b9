//! Axum integration for Showtime.
//!
//! The pieces every HTTP surface needs, independent of the booking domain:
//!
//! - [`AppError`]: handler error type rendering `{"error", "code"}` JSON bodies
//! - [`correlation_id_layer`]: per-request correlation IDs and tracing spans
//! - [`CorrelationId`] and [`BearerToken`] extractors
//! - [`ApiJson`], [`ApiPath`] and [`ApiQuery`], whose rejections render through [`AppError`]
//! - Liveness and readiness handlers
//!
//! # Request Flow
//!
//! 1. **Correlation layer** assigns an ID and opens the request span
//! 2. **Extractors** pull path, JSON body and bearer token
//! 3. **Handler** calls the domain and maps its error into [`AppError`]
//! 4. **Response** carries the correlation ID header
//!
//! # Example
//!
//! ```
//! use axum::{Router, routing::get};
//! use showtime_web::{correlation_id_layer, handlers::health_check};
//!
//! let app: Router = Router::new()
//!     .route("/health", get(health_check))
//!     .layer(correlation_id_layer());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{ApiJson, ApiPath, ApiQuery, BearerToken, CorrelationId};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
