//! Booking engine: seat reservation and payment.
//!
//! # State Machine
//!
//! ```text
//! NONE ──reserve──▶ PENDING ──pay──▶ CONFIRMED (ticket issued)
//! NONE ──checkout──────────────────▶ CONFIRMED (no ticket)
//! ```
//!
//! A seat is sold at most once. Reserving does not touch the seat: several
//! users may hold pending bookings on it, and the first to pay wins. Selling
//! is delegated to the catalog store's atomic units of work
//! ([`CatalogStore::confirm_booking`], [`CatalogStore::book_seat`]), so the
//! engine itself holds no state and needs no locks.
//!
//! Pending bookings never expire.

use crate::cache::ListingCache;
use crate::error::BookingError;
use crate::listing::PLACEHOLDER_IMAGE;
use crate::metrics;
use serde::Serialize;
use showtime_core::catalog::{CatalogError, CatalogStore};
use showtime_core::environment::{Clock, CurrentUser, TicketCodeGenerator};
use showtime_core::types::{
    Booking, BookingId, NewBooking, PaymentStatus, SeatId, ShowId, TicketCode, UserId,
};
use std::sync::Arc;

/// Attempts at issuing a ticket before a code collision is reported.
const MAX_CODE_ATTEMPTS: usize = 3;

/// Batch checkout input.
#[derive(Clone, Debug)]
pub struct CheckoutRequest {
    /// The show being booked
    pub show_id: ShowId,
    /// Seats in the order they should be claimed
    pub seat_ids: Vec<SeatId>,
    /// How many seats the buyer asked for
    pub quantity: usize,
    /// Buyer name
    pub name: String,
    /// Buyer email
    pub email: String,
}

/// Outcome of a batch checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckoutConfirmation {
    /// Movie title
    pub title: String,
    /// Event card image
    pub image: &'static str,
    /// Buyer name
    pub name: String,
    /// Buyer email
    pub email: String,
    /// Seats requested
    pub quantity: usize,
    /// Bookings created, in request order
    pub confirmed: Vec<BookingId>,
    /// Seats that could not be claimed
    pub skipped: Vec<SeatId>,
}

/// Reservation and payment orchestration over a [`CatalogStore`].
#[derive(Clone)]
pub struct BookingEngine {
    store: Arc<dyn CatalogStore>,
    cache: Arc<ListingCache>,
    clock: Arc<dyn Clock>,
    codes: Arc<dyn TicketCodeGenerator>,
}

fn require_user<U: CurrentUser + ?Sized>(user: &U) -> Result<UserId, BookingError> {
    user.current_user_id().ok_or(BookingError::Unauthenticated)
}

impl BookingEngine {
    /// Create an engine.
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: Arc<ListingCache>,
        clock: Arc<dyn Clock>,
        codes: Arc<dyn TicketCodeGenerator>,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
            codes,
        }
    }

    /// Create a pending booking for a free seat.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthenticated`] without a current user
    /// - [`BookingError::SeatUnavailable`] if the seat is missing, belongs to
    ///   another show, or is already sold
    /// - [`BookingError::Catalog`] on storage failure
    #[tracing::instrument(skip(self, user))]
    pub async fn reserve<U: CurrentUser + Sync + ?Sized>(
        &self,
        user: &U,
        show_id: ShowId,
        seat_id: SeatId,
    ) -> Result<BookingId, BookingError> {
        let user_id = require_user(user)?;

        let available = self
            .store
            .get_seat(seat_id)
            .await?
            .is_some_and(|seat| seat.show_id == show_id && !seat.is_booked);
        if !available {
            metrics::record_seat_conflict("reserve");
            return Err(BookingError::SeatUnavailable);
        }

        let booking = self
            .store
            .create_booking(NewBooking {
                user_id,
                show_id,
                seat_id,
                payment_status: PaymentStatus::Pending,
                booking_time: self.clock.now(),
            })
            .await?;

        metrics::record_booking_reserved();
        tracing::info!(booking_id = %booking.id, %user_id, "Seat reserved");

        Ok(booking.id)
    }

    /// Pay for a booking and return its ticket code.
    ///
    /// Paying an already-confirmed booking returns the code already issued
    /// for it. On success the listing cache is cleared.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthenticated`] without a current user
    /// - [`BookingError::BookingNotFound`] if the booking is missing or not the caller's
    /// - [`BookingError::SeatUnavailable`] if the seat was sold to someone else first
    /// - [`BookingError::Catalog`] on storage failure
    #[tracing::instrument(skip(self, user))]
    pub async fn pay<U: CurrentUser + Sync + ?Sized>(
        &self,
        user: &U,
        booking_id: BookingId,
    ) -> Result<TicketCode, BookingError> {
        let user_id = require_user(user)?;

        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .filter(|b| b.user_id == user_id)
            .ok_or(BookingError::BookingNotFound)?;

        if booking.is_confirmed() {
            return self.existing_ticket(&booking).await;
        }

        let mut attempt = 0;
        let outcome = loop {
            attempt += 1;
            match self
                .store
                .confirm_booking(booking_id, self.codes.next_code())
                .await
            {
                Err(CatalogError::Conflict(reason)) if attempt < MAX_CODE_ATTEMPTS => {
                    tracing::warn!(%booking_id, attempt, %reason, "Ticket code collision, retrying");
                }
                other => break other?,
            }
        };

        match outcome {
            Some(ticket) => {
                self.cache.clear_all().await;
                metrics::record_payment_confirmed();
                tracing::info!(%booking_id, seat_id = %booking.seat_id, "Payment confirmed");
                Ok(ticket.ticket_code)
            }
            None => {
                // A concurrent payment of this same booking may have won.
                if let Some(ticket) = self.store.ticket_for_booking(booking_id).await? {
                    return Ok(ticket.ticket_code);
                }
                metrics::record_seat_conflict("pay");
                tracing::info!(%booking_id, seat_id = %booking.seat_id, "Seat already sold");
                Err(BookingError::SeatUnavailable)
            }
        }
    }

    /// Ticket for a booking that is already confirmed.
    ///
    /// Checkout bookings are confirmed without a ticket; paying for one
    /// issues it. The store's one-ticket-per-booking constraint settles races.
    async fn existing_ticket(&self, booking: &Booking) -> Result<TicketCode, BookingError> {
        if let Some(ticket) = self.store.ticket_for_booking(booking.id).await? {
            return Ok(ticket.ticket_code);
        }

        match self
            .store
            .create_ticket(booking.id, self.codes.next_code())
            .await
        {
            Ok(ticket) => Ok(ticket.ticket_code),
            Err(err @ CatalogError::Conflict(_)) => self
                .store
                .ticket_for_booking(booking.id)
                .await?
                .map(|ticket| ticket.ticket_code)
                .ok_or(BookingError::Catalog(err)),
            Err(err) => Err(err.into()),
        }
    }

    /// Book and confirm several seats of one show directly, best effort.
    ///
    /// Seats that cannot be claimed are skipped. No tickets are issued on this
    /// path. The listing cache is cleared when at least one seat was confirmed.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Unauthenticated`] without a current user
    /// - [`BookingError::Validation`] if the seat count does not match `quantity`
    ///   or name/email are blank
    /// - [`BookingError::ShowNotFound`] for an unknown show
    /// - [`BookingError::Catalog`] on storage failure
    #[tracing::instrument(skip(self, user, request), fields(show_id = %request.show_id, seats = request.seat_ids.len()))]
    pub async fn batch_book_and_confirm<U: CurrentUser + Sync + ?Sized>(
        &self,
        user: &U,
        request: CheckoutRequest,
    ) -> Result<CheckoutConfirmation, BookingError> {
        let user_id = require_user(user)?;

        if request.seat_ids.is_empty() || request.seat_ids.len() != request.quantity {
            return Err(BookingError::Validation(format!(
                "Please select {} seat(s).",
                request.quantity
            )));
        }
        if request.name.trim().is_empty() || request.email.trim().is_empty() {
            return Err(BookingError::Validation("All fields required.".to_string()));
        }

        let show = self
            .store
            .get_show(request.show_id)
            .await?
            .ok_or(BookingError::ShowNotFound)?;

        let mut confirmed = Vec::with_capacity(request.seat_ids.len());
        let mut skipped = Vec::new();
        for &seat_id in &request.seat_ids {
            let booked = self
                .store
                .book_seat(NewBooking {
                    user_id,
                    show_id: show.id,
                    seat_id,
                    payment_status: PaymentStatus::Confirmed,
                    booking_time: self.clock.now(),
                })
                .await?;
            match booked {
                Some(booking) => confirmed.push(booking.id),
                None => skipped.push(seat_id),
            }
        }

        if !confirmed.is_empty() {
            self.cache.clear_all().await;
        }
        metrics::record_checkout(confirmed.len(), skipped.len());
        tracing::info!(
            %user_id,
            confirmed = confirmed.len(),
            skipped = skipped.len(),
            "Checkout completed"
        );

        Ok(CheckoutConfirmation {
            title: show.name,
            image: PLACEHOLDER_IMAGE,
            name: request.name,
            email: request.email,
            quantity: request.quantity,
            confirmed,
            skipped,
        })
    }
}

impl std::fmt::Debug for BookingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingEngine")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
