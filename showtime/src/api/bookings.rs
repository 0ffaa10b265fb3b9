//! Booking endpoints.
//!
//! Two flows, both requiring a session:
//!
//! ```text
//! reserve + pay:  POST /api/book ──▶ pending ──▶ POST /api/pay/:id ──▶ confirmed + ticket
//! checkout:       POST /api/checkout ──────────────────────────────▶ confirmed (per seat)
//! ```
//!
//! - GET /api/my-bookings - The caller's bookings

use crate::engine::{CheckoutConfirmation, CheckoutRequest};
use crate::error::catalog_failure;
use crate::server::state::AppState;
use crate::session::SessionUser;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use showtime_core::types::{BookingId, SeatId, ShowId, TicketCode};
use showtime_web::{ApiJson, ApiPath, AppError, CorrelationId};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to reserve a seat.
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    /// Show the seat belongs to
    pub show_id: ShowId,
    /// Seat to reserve
    pub seat_id: SeatId,
}

/// Response after reserving a seat.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    /// The pending booking
    pub booking_id: BookingId,
}

/// Response after paying for a booking.
#[derive(Debug, Serialize)]
pub struct PayResponse {
    /// Ticket code
    pub ticket: TicketCode,
}

const fn one() -> usize {
    1
}

/// Request to buy several seats at once.
#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    /// Show being booked
    pub show_id: ShowId,
    /// Seats to claim, in order
    #[serde(default)]
    pub seat_ids: Vec<SeatId>,
    /// Number of seats wanted
    #[serde(default = "one")]
    pub quantity: usize,
    /// Buyer name
    #[serde(default)]
    pub name: String,
    /// Buyer email
    #[serde(default)]
    pub email: String,
}

impl From<CheckoutBody> for CheckoutRequest {
    fn from(body: CheckoutBody) -> Self {
        Self {
            show_id: body.show_id,
            seat_ids: body.seat_ids,
            quantity: body.quantity,
            name: body.name,
            email: body.email,
        }
    }
}

/// One row of the caller's booking history.
#[derive(Debug, Serialize)]
pub struct BookingRow {
    /// Movie title
    pub movie: String,
    /// Seat label
    pub seat: String,
    /// Show start, `%Y-%m-%d %H:%M`
    pub time: String,
    /// `pending` or `confirmed`
    pub status: &'static str,
}

/// Booking history response.
#[derive(Debug, Serialize)]
pub struct MyBookingsResponse {
    /// Bookings, oldest first
    pub bookings: Vec<BookingRow>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Reserve a seat (pending until paid).
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/book \
///   -H "Authorization: Bearer <session_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"show_id": 1, "seat_id": 3}'
/// # {"booking_id": 42}
/// ```
///
/// # Errors
///
/// 409 `seat unavailable` when the seat is missing, sold or not part of the show.
pub async fn book(
    session: SessionUser,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    let booking_id = state
        .engine
        .reserve(&session, request.show_id, request.seat_id)
        .await?;
    Ok(Json(BookResponse { booking_id }))
}

/// Pay for a pending booking and receive the ticket code.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/pay/42 \
///   -H "Authorization: Bearer <session_token>"
/// # {"ticket": "3F9A0C1B"}
/// ```
///
/// # Errors
///
/// - 404 `booking not found` for unknown or foreign bookings
/// - 409 `seat unavailable` when another booking already paid for the seat
pub async fn pay(
    correlation_id: CorrelationId,
    session: SessionUser,
    ApiPath(booking_id): ApiPath<i64>,
    State(state): State<AppState>,
) -> Result<Json<PayResponse>, AppError> {
    let ticket = state
        .engine
        .pay(&session, BookingId::new(booking_id))
        .await?;
    tracing::info!(%correlation_id, user_id = %session.user_id, booking_id, "Payment accepted");
    Ok(Json(PayResponse { ticket }))
}

/// Book and confirm several seats directly.
///
/// Seats that are already sold are skipped and listed in `skipped`.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/checkout \
///   -H "Authorization: Bearer <session_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"show_id": 1, "seat_ids": [4, 5], "quantity": 2, "name": "Priya", "email": "priya@example.com"}'
/// ```
///
/// # Errors
///
/// - 422 when the seat count does not match `quantity` or name/email are blank
/// - 404 `show not found`
pub async fn checkout(
    correlation_id: CorrelationId,
    session: SessionUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckoutBody>,
) -> Result<Json<CheckoutConfirmation>, AppError> {
    let confirmation = state
        .engine
        .batch_book_and_confirm(&session, body.into())
        .await?;
    tracing::info!(
        %correlation_id,
        user_id = %session.user_id,
        confirmed = confirmation.confirmed.len(),
        skipped = confirmation.skipped.len(),
        "Checkout accepted"
    );
    Ok(Json(confirmation))
}

/// The caller's bookings with movie, seat and show time.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/my-bookings -H "Authorization: Bearer <session_token>"
/// ```
pub async fn my_bookings(
    session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<MyBookingsResponse>, AppError> {
    let bookings = state
        .store
        .list_user_bookings(session.user_id)
        .await
        .map_err(catalog_failure)?;

    Ok(Json(MyBookingsResponse {
        bookings: bookings
            .into_iter()
            .map(|details| BookingRow {
                movie: details.show_name,
                seat: details.seat_number,
                time: details.start_time.format("%Y-%m-%d %H:%M").to_string(),
                status: details.booking.payment_status.as_str(),
            })
            .collect(),
    }))
}
