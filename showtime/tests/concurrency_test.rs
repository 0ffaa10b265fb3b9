//! Concurrency tests for last-seat scenarios.
//!
//! Many tasks race for one seat on a multi-threaded runtime. Exactly one
//! must win, whichever booking path it comes through.
//!
//! Run with: `cargo test --test concurrency_test -- --nocapture`

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use showtime::cache::{DEFAULT_TTL, ListingCache};
use showtime::engine::{BookingEngine, CheckoutRequest};
use showtime::error::BookingError;
use showtime_core::environment::UuidTicketCodes;
use showtime_core::types::{PaymentStatus, UserId};
use showtime_testing::fixtures::CatalogFixture;
use showtime_testing::{InMemoryCatalogStore, test_clock};
use std::sync::Arc;

const RACERS: i64 = 50;

async fn setup() -> (InMemoryCatalogStore, Arc<BookingEngine>, CatalogFixture) {
    let store = InMemoryCatalogStore::new();
    let fixture = CatalogFixture::chennai(&store).await.unwrap();
    let clock = Arc::new(test_clock());
    let engine = BookingEngine::new(
        Arc::new(store.clone()),
        Arc::new(ListingCache::new(clock.clone(), DEFAULT_TTL)),
        clock,
        Arc::new(UuidTicketCodes),
    );
    (store, Arc::new(engine), fixture)
}

/// 50 users hold pending bookings on one seat and pay at the same time.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payments_sell_seat_once() {
    let (store, engine, fixture) = setup().await;
    let seat = fixture.seats[0].id;

    let mut bookings = Vec::new();
    for n in 1..=RACERS {
        let user = UserId::new(n);
        let booking = engine.reserve(&user, fixture.show.id, seat).await.unwrap();
        bookings.push((user, booking));
    }

    let handles: Vec<_> = bookings
        .into_iter()
        .map(|(user, booking)| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.pay(&user, booking).await })
        })
        .collect();

    let mut wins = 0;
    let mut losses = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(BookingError::SeatUnavailable) => losses += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    println!("payments: {wins} won, {losses} lost");
    assert_eq!(wins, 1);
    assert_eq!(losses, RACERS - 1);
    assert_eq!(store.bookings_for_seat(seat, PaymentStatus::Confirmed), 1);
    assert_eq!(store.tickets().len(), 1);
}

/// 50 users check out the same seat at the same time.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_sell_seat_once() {
    let (store, engine, fixture) = setup().await;
    let seat = fixture.seats[0].id;

    let handles: Vec<_> = (1..=RACERS)
        .map(|n| {
            let engine = engine.clone();
            let request = CheckoutRequest {
                show_id: fixture.show.id,
                seat_ids: vec![seat],
                quantity: 1,
                name: format!("user{n}"),
                email: format!("user{n}@example.com"),
            };
            tokio::spawn(async move {
                engine
                    .batch_book_and_confirm(&UserId::new(n), request)
                    .await
            })
        })
        .collect();

    let mut confirmed = 0;
    let mut skipped = 0;
    for handle in handles {
        let confirmation = handle.await.unwrap().unwrap();
        confirmed += confirmation.confirmed.len();
        skipped += confirmation.skipped.len();
    }

    assert_eq!(confirmed, 1);
    assert_eq!(skipped, 49);
    assert_eq!(store.bookings_for_seat(seat, PaymentStatus::Confirmed), 1);
}

/// Payments and checkouts racing for the same seat.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_payment_and_checkout_race() {
    let (store, engine, fixture) = setup().await;
    let seat = fixture.seats[1].id;

    // Reserve before anything can sell the seat.
    let mut pending = Vec::new();
    for n in (2..=RACERS).step_by(2) {
        let user = UserId::new(n);
        pending.push((user, engine.reserve(&user, fixture.show.id, seat).await.unwrap()));
    }

    let mut handles = Vec::new();
    for (user, booking) in pending {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.pay(&user, booking).await.is_ok()
        }));
    }
    for n in (1..=RACERS).step_by(2) {
        let engine = engine.clone();
        let request = CheckoutRequest {
            show_id: fixture.show.id,
            seat_ids: vec![seat],
            quantity: 1,
            name: "racer".to_string(),
            email: "racer@example.com".to_string(),
        };
        handles.push(tokio::spawn(async move {
            engine
                .batch_book_and_confirm(&UserId::new(n), request)
                .await
                .is_ok_and(|c| !c.confirmed.is_empty())
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.bookings_for_seat(seat, PaymentStatus::Confirmed), 1);
}
