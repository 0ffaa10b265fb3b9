//! Booking engine tests against the in-memory catalog.
//!
//! Covers the reserve/pay flow, batch checkout, and how both interact with
//! the listing cache.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use showtime::cache::{CacheStatus, DEFAULT_TTL, ListingCache};
use showtime::engine::{BookingEngine, CheckoutRequest};
use showtime::error::BookingError;
use showtime::listing::{DEFAULT_MAX_RESULTS, ListingQuery};
use showtime_core::catalog::CatalogStore;
use showtime_core::types::{BookingId, PaymentStatus, SeatId, ShowId, UserId};
use showtime_testing::fixtures::{CatalogFixture, add_seats, add_show};
use showtime_testing::{InMemoryCatalogStore, SequentialTicketCodes, test_clock};
use std::sync::Arc;

const ALICE: UserId = UserId::new(100);
const BOB: UserId = UserId::new(200);

struct Harness {
    store: InMemoryCatalogStore,
    cache: Arc<ListingCache>,
    listing: ListingQuery,
    engine: BookingEngine,
    fixture: CatalogFixture,
}

async fn harness() -> Harness {
    let store = InMemoryCatalogStore::new();
    let fixture = CatalogFixture::chennai(&store).await.unwrap();
    let clock = Arc::new(test_clock());
    let cache = Arc::new(ListingCache::new(clock.clone(), DEFAULT_TTL));
    let shared: Arc<dyn CatalogStore> = Arc::new(store.clone());
    let engine = BookingEngine::new(
        shared.clone(),
        cache.clone(),
        clock,
        Arc::new(SequentialTicketCodes::new()),
    );

    Harness {
        listing: ListingQuery::new(shared, DEFAULT_MAX_RESULTS),
        store,
        cache,
        engine,
        fixture,
    }
}

impl Harness {
    fn seat(&self, index: usize) -> SeatId {
        self.fixture.seats[index].id
    }

    async fn warm_cache(&self) {
        let listing = self
            .cache
            .get_or_compute("Chennai", || self.listing.list_shows_by_city("Chennai"))
            .await
            .unwrap();
        assert_eq!(listing.status, CacheStatus::Miss);
        assert!(self.cache.get("Chennai").await.is_some());
    }

    fn checkout(&self, seats: &[SeatId], quantity: usize) -> CheckoutRequest {
        CheckoutRequest {
            show_id: self.fixture.show.id,
            seat_ids: seats.to_vec(),
            quantity,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }
}

// ============================================================================
// Reserve
// ============================================================================

#[tokio::test]
async fn test_reserve_creates_pending_booking_without_selling_seat() {
    let h = harness().await;

    let booking_id = h
        .engine
        .reserve(&ALICE, h.fixture.show.id, h.seat(0))
        .await
        .unwrap();

    let booking = h.store.get_booking(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(booking.user_id, ALICE);
    assert!(!h.store.get_seat(h.seat(0)).await.unwrap().unwrap().is_booked);
}

#[tokio::test]
async fn test_reserve_requires_user() {
    let h = harness().await;

    let result = h
        .engine
        .reserve(&None::<UserId>, h.fixture.show.id, h.seat(0))
        .await;

    assert!(matches!(result, Err(BookingError::Unauthenticated)));
}

#[tokio::test]
async fn test_reserve_rejects_missing_booked_and_foreign_seats() {
    let h = harness().await;
    let other_show = add_show(&h.store, &h.fixture.theater, "Vedhalam", 2).await.unwrap();
    let foreign = add_seats(&h.store, &other_show, &["A1"]).await.unwrap();
    h.store.conditionally_mark_seat_booked(h.seat(1)).await.unwrap();

    for seat in [SeatId::new(9_999), h.seat(1), foreign[0].id] {
        let result = h.engine.reserve(&ALICE, h.fixture.show.id, seat).await;
        assert!(
            matches!(result, Err(BookingError::SeatUnavailable)),
            "seat {seat} should be unavailable"
        );
    }
}

// ============================================================================
// Pay
// ============================================================================

#[tokio::test]
async fn test_pay_issues_ticket_and_clears_cache() {
    let h = harness().await;
    h.warm_cache().await;
    let booking_id = h.engine.reserve(&ALICE, h.fixture.show.id, h.seat(0)).await.unwrap();

    let ticket = h.engine.pay(&ALICE, booking_id).await.unwrap();

    assert_eq!(ticket.as_str(), "TKT00001");
    let booking = h.store.get_booking(booking_id).await.unwrap().unwrap();
    assert!(booking.is_confirmed());
    assert!(h.store.get_seat(h.seat(0)).await.unwrap().unwrap().is_booked);
    assert!(h.cache.get("Chennai").await.is_none());
}

#[tokio::test]
async fn test_pay_twice_returns_same_ticket() {
    let h = harness().await;
    let booking_id = h.engine.reserve(&ALICE, h.fixture.show.id, h.seat(0)).await.unwrap();

    let first = h.engine.pay(&ALICE, booking_id).await.unwrap();
    let second = h.engine.pay(&ALICE, booking_id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.store.tickets().len(), 1);
}

#[tokio::test]
async fn test_pay_foreign_or_unknown_booking_is_not_found() {
    let h = harness().await;
    let booking_id = h.engine.reserve(&ALICE, h.fixture.show.id, h.seat(0)).await.unwrap();

    assert!(matches!(
        h.engine.pay(&BOB, booking_id).await,
        Err(BookingError::BookingNotFound)
    ));
    assert!(matches!(
        h.engine.pay(&ALICE, BookingId::new(9_999)).await,
        Err(BookingError::BookingNotFound)
    ));
    assert!(h.store.tickets().is_empty());
}

#[tokio::test]
async fn test_first_payment_wins_the_seat() {
    let h = harness().await;
    let alice_booking = h.engine.reserve(&ALICE, h.fixture.show.id, h.seat(0)).await.unwrap();
    let bob_booking = h.engine.reserve(&BOB, h.fixture.show.id, h.seat(0)).await.unwrap();

    h.engine.pay(&BOB, bob_booking).await.unwrap();
    let result = h.engine.pay(&ALICE, alice_booking).await;

    assert!(matches!(result, Err(BookingError::SeatUnavailable)));
    assert_eq!(h.store.bookings_for_seat(h.seat(0), PaymentStatus::Confirmed), 1);
    assert_eq!(h.store.bookings_for_seat(h.seat(0), PaymentStatus::Pending), 1);
    assert_eq!(h.store.tickets().len(), 1);
}

#[tokio::test]
async fn test_reserve_after_sale_is_rejected() {
    let h = harness().await;
    let booking_id = h.engine.reserve(&ALICE, h.fixture.show.id, h.seat(0)).await.unwrap();
    h.engine.pay(&ALICE, booking_id).await.unwrap();

    let result = h.engine.reserve(&BOB, h.fixture.show.id, h.seat(0)).await;

    assert!(matches!(result, Err(BookingError::SeatUnavailable)));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_confirms_free_seats_and_skips_sold_ones() {
    let h = harness().await;
    h.warm_cache().await;
    h.store.conditionally_mark_seat_booked(h.seat(1)).await.unwrap();

    let confirmation = h
        .engine
        .batch_book_and_confirm(&ALICE, h.checkout(&[h.seat(0), h.seat(1), h.seat(2)], 3))
        .await
        .unwrap();

    assert_eq!(confirmation.title, "Coolie");
    assert_eq!(confirmation.image, "/static/event_default.jpg");
    assert_eq!(confirmation.quantity, 3);
    assert_eq!(confirmation.confirmed.len(), 2);
    assert_eq!(confirmation.skipped, vec![h.seat(1)]);
    for seat in [h.seat(0), h.seat(2)] {
        assert!(h.store.get_seat(seat).await.unwrap().unwrap().is_booked);
        assert_eq!(h.store.bookings_for_seat(seat, PaymentStatus::Confirmed), 1);
    }
    // Checkout issues no tickets.
    assert!(h.store.tickets().is_empty());
    assert!(h.cache.get("Chennai").await.is_none());
}

#[tokio::test]
async fn test_checkout_that_confirms_nothing_keeps_cache() {
    let h = harness().await;
    h.store.conditionally_mark_seat_booked(h.seat(0)).await.unwrap();
    h.warm_cache().await;

    let confirmation = h
        .engine
        .batch_book_and_confirm(&ALICE, h.checkout(&[h.seat(0)], 1))
        .await
        .unwrap();

    assert!(confirmation.confirmed.is_empty());
    assert!(h.cache.get("Chennai").await.is_some());
}

#[tokio::test]
async fn test_checkout_validates_seat_count_before_fields() {
    let h = harness().await;

    let mut request = h.checkout(&[h.seat(0)], 2);
    request.name = String::new();
    let err = h.engine.batch_book_and_confirm(&ALICE, request).await.unwrap_err();
    assert_eq!(err.to_string(), "Please select 2 seat(s).");

    let mut request = h.checkout(&[h.seat(0)], 1);
    request.email = "  ".to_string();
    let err = h.engine.batch_book_and_confirm(&ALICE, request).await.unwrap_err();
    assert_eq!(err.to_string(), "All fields required.");

    let err = h
        .engine
        .batch_book_and_confirm(&ALICE, h.checkout(&[], 0))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));
}

#[tokio::test]
async fn test_checkout_unknown_show() {
    let h = harness().await;
    let mut request = h.checkout(&[h.seat(0)], 1);
    request.show_id = ShowId::new(9_999);

    let result = h.engine.batch_book_and_confirm(&ALICE, request).await;

    assert!(matches!(result, Err(BookingError::ShowNotFound)));
}

#[tokio::test]
async fn test_pay_on_checkout_booking_issues_single_ticket() {
    let h = harness().await;
    let confirmation = h
        .engine
        .batch_book_and_confirm(&ALICE, h.checkout(&[h.seat(0)], 1))
        .await
        .unwrap();
    let booking_id = confirmation.confirmed[0];

    let first = h.engine.pay(&ALICE, booking_id).await.unwrap();
    let second = h.engine.pay(&ALICE, booking_id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.store.tickets().len(), 1);
}

#[tokio::test]
async fn test_pending_booking_loses_to_checkout() {
    let h = harness().await;
    let pending = h.engine.reserve(&BOB, h.fixture.show.id, h.seat(0)).await.unwrap();
    h.engine
        .batch_book_and_confirm(&ALICE, h.checkout(&[h.seat(0)], 1))
        .await
        .unwrap();

    let result = h.engine.pay(&BOB, pending).await;

    assert!(matches!(result, Err(BookingError::SeatUnavailable)));
    assert_eq!(h.store.bookings_for_seat(h.seat(0), PaymentStatus::Confirmed), 1);
}
