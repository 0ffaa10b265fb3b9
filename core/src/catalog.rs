//! Catalog store trait and related types.
//!
//! The catalog store exclusively owns the persisted state of theaters, shows,
//! seats, users, bookings and tickets. Everything else in the system
//! orchestrates mutations through this trait and holds no entity state.
//!
//! # Implementations
//!
//! - `PostgresCatalogStore` (in `showtime-postgres`): production storage
//! - `InMemoryCatalogStore` (in `showtime-testing`): fast, deterministic testing
//!
//! # Atomicity
//!
//! Selling a seat is a compare-and-swap on the seat's booked flag. The three
//! write paths that can sell a seat ([`CatalogStore::conditionally_mark_seat_booked`],
//! [`CatalogStore::confirm_booking`] and [`CatalogStore::book_seat`]) must each
//! flip the flag only if it was still `false`, in the same unit of work as the
//! rows they create. Two concurrent callers on one seat: exactly one wins.
//!
//! # Example
//!
//! ```no_run
//! use showtime_core::catalog::{CatalogError, CatalogStore};
//! use showtime_core::types::SeatId;
//!
//! async fn is_free<C: CatalogStore + ?Sized>(store: &C, seat: SeatId) -> Result<bool, CatalogError> {
//!     Ok(store.get_seat(seat).await?.is_some_and(|s| !s.is_booked))
//! }
//! ```

use crate::types::{
    Booking, BookingDetails, BookingId, CatalogTheater, NewBooking, NewSeat, NewShow, NewTheater,
    NewUser, PaymentStatus, Seat, SeatId, Show, ShowId, Theater, TheaterId, Ticket, TicketCode,
    User, UserId,
};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by every [`CatalogStore`] method.
pub type CatalogFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CatalogError>> + Send + 'a>>;

/// Errors that can occur during catalog operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A uniqueness constraint rejected the write (duplicate email, ticket code, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Connection or query failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Stored data could not be mapped back into domain types.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Storage abstraction for the booking catalog.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single instance is shared by every
/// request handler behind an `Arc<dyn CatalogStore>`.
///
/// # Dyn Compatibility
///
/// Methods return [`CatalogFuture`] instead of using `async fn` so the trait can
/// be used as a trait object.
pub trait CatalogStore: Send + Sync {
    // ------------------------------------------------------------------------
    // Catalog reads
    // ------------------------------------------------------------------------

    /// Look up a theater.
    fn get_theater(&self, id: TheaterId) -> CatalogFuture<'_, Option<Theater>>;

    /// Look up a show.
    fn get_show(&self, id: ShowId) -> CatalogFuture<'_, Option<Show>>;

    /// Look up a seat.
    fn get_seat(&self, id: SeatId) -> CatalogFuture<'_, Option<Seat>>;

    /// Shows hosted by theaters in `city`, joined with their theater.
    ///
    /// Ordered by show id (insertion order), at most `limit` rows.
    fn list_shows_by_theater_city<'a>(
        &'a self,
        city: &'a str,
        limit: usize,
    ) -> CatalogFuture<'a, Vec<(Show, Theater)>>;

    /// All seats of a show, ordered by seat id.
    fn list_seats(&self, show_id: ShowId) -> CatalogFuture<'_, Vec<Seat>>;

    /// Distinct theater cities, sorted.
    fn list_cities(&self) -> CatalogFuture<'_, Vec<String>>;

    /// Number of theaters in the catalog.
    fn count_theaters(&self) -> CatalogFuture<'_, u64>;

    // ------------------------------------------------------------------------
    // Catalog writes (seeding)
    // ------------------------------------------------------------------------

    /// Insert a theater.
    fn create_theater(&self, theater: NewTheater) -> CatalogFuture<'_, Theater>;

    /// Insert a show.
    fn create_show(&self, show: NewShow) -> CatalogFuture<'_, Show>;

    /// Insert an unbooked seat.
    fn create_seat(&self, seat: NewSeat) -> CatalogFuture<'_, Seat>;

    /// Insert theaters with their shows and seats as one unit of work.
    ///
    /// Either every row is stored or none is.
    fn import_catalog(&self, theaters: Vec<CatalogTheater>) -> CatalogFuture<'_, ()>;

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Conflict`] if the email or username is already taken.
    fn create_user(&self, user: NewUser) -> CatalogFuture<'_, User>;

    /// Look up a user by email.
    fn find_user_by_email<'a>(&'a self, email: &'a str) -> CatalogFuture<'a, Option<User>>;

    // ------------------------------------------------------------------------
    // Bookings and tickets
    // ------------------------------------------------------------------------

    /// Insert a booking as given. Does not touch the seat.
    fn create_booking(&self, booking: NewBooking) -> CatalogFuture<'_, Booking>;

    /// Look up a booking.
    fn get_booking(&self, id: BookingId) -> CatalogFuture<'_, Option<Booking>>;

    /// Overwrite a booking's payment status. Returns `false` if the booking does not exist.
    fn update_booking_status(
        &self,
        id: BookingId,
        status: PaymentStatus,
    ) -> CatalogFuture<'_, bool>;

    /// Insert a ticket.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Conflict`] if the code or booking already has a ticket.
    fn create_ticket(&self, booking_id: BookingId, code: TicketCode) -> CatalogFuture<'_, Ticket>;

    /// The ticket issued for a booking, if any.
    fn ticket_for_booking(&self, booking_id: BookingId) -> CatalogFuture<'_, Option<Ticket>>;

    /// Atomically flip a seat's booked flag from `false` to `true`.
    ///
    /// Returns `true` iff this call performed the transition. Missing seats
    /// and already-booked seats return `false`.
    fn conditionally_mark_seat_booked(&self, seat_id: SeatId) -> CatalogFuture<'_, bool>;

    /// Payment unit of work for a pending booking.
    ///
    /// In one transaction: mark the booking's seat booked (only if unbooked),
    /// set the booking to [`PaymentStatus::Confirmed`] (only if pending) and
    /// insert a ticket carrying `code`. Returns `None` and writes nothing when
    /// the booking is missing, no longer pending, or its seat is already sold.
    fn confirm_booking(
        &self,
        booking_id: BookingId,
        code: TicketCode,
    ) -> CatalogFuture<'_, Option<Ticket>>;

    /// Direct-sale unit of work used by checkout.
    ///
    /// In one transaction: mark `booking.seat_id` booked (only if it belongs to
    /// `booking.show_id` and is unbooked) and insert `booking`. Returns `None`
    /// and writes nothing when the seat cannot be claimed.
    fn book_seat(&self, booking: NewBooking) -> CatalogFuture<'_, Option<Booking>>;

    /// Every booking of a user joined with show title, start time and seat label,
    /// ordered by booking id.
    fn list_user_bookings(&self, user_id: UserId) -> CatalogFuture<'_, Vec<BookingDetails>>;
}
