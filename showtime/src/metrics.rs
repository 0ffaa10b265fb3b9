//! Business metrics for the booking server.
//!
//! Recorded through the `metrics` facade; `main` installs the Prometheus
//! exporter. Without an installed recorder every call is a no-op, which is
//! what unit tests rely on.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `showtime_listing_cache_lookups_total{status}` - Listing lookups by `HIT`/`MISS`
//! - `showtime_listing_cache_clears_total` - Full cache invalidations
//! - `showtime_bookings_reserved_total` - Pending bookings created
//! - `showtime_payments_confirmed_total` - Tickets issued by payment
//! - `showtime_seat_conflicts_total{operation}` - Seat claims lost (`reserve`, `pay`)
//! - `showtime_checkout_seats_total{outcome}` - Checkout seats `confirmed` or `skipped`
//! - `showtime_accounts_registered_total` - New accounts

use crate::cache::CacheStatus;
use metrics::describe_counter;

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "showtime_listing_cache_lookups_total",
        "Listing cache lookups by status (HIT, MISS)"
    );
    describe_counter!(
        "showtime_listing_cache_clears_total",
        "Number of full listing cache invalidations"
    );
    describe_counter!(
        "showtime_bookings_reserved_total",
        "Pending bookings created"
    );
    describe_counter!(
        "showtime_payments_confirmed_total",
        "Bookings confirmed by payment (one ticket each)"
    );
    describe_counter!(
        "showtime_seat_conflicts_total",
        "Seat claims rejected because the seat was unavailable, by operation"
    );
    describe_counter!(
        "showtime_checkout_seats_total",
        "Seats processed by batch checkout, by outcome (confirmed, skipped)"
    );
    describe_counter!(
        "showtime_accounts_registered_total",
        "User accounts registered"
    );

    tracing::info!("Business metrics registered");
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a listing cache lookup.
pub fn record_cache_lookup(status: CacheStatus) {
    metrics::counter!("showtime_listing_cache_lookups_total", "status" => status.as_str())
        .increment(1);
}

/// Record a full cache invalidation.
pub fn record_cache_cleared() {
    metrics::counter!("showtime_listing_cache_clears_total").increment(1);
}

/// Record a pending booking.
pub fn record_booking_reserved() {
    metrics::counter!("showtime_bookings_reserved_total").increment(1);
}

/// Record a confirmed payment.
pub fn record_payment_confirmed() {
    metrics::counter!("showtime_payments_confirmed_total").increment(1);
}

/// Record a lost seat claim.
///
/// # Arguments
///
/// * `operation` - `reserve` or `pay`
pub fn record_seat_conflict(operation: &'static str) {
    metrics::counter!("showtime_seat_conflicts_total", "operation" => operation).increment(1);
    tracing::debug!(operation, "Recorded seat_conflict metric");
}

/// Record the outcome of a batch checkout.
pub fn record_checkout(confirmed: usize, skipped: usize) {
    metrics::counter!("showtime_checkout_seats_total", "outcome" => "confirmed")
        .increment(confirmed as u64);
    metrics::counter!("showtime_checkout_seats_total", "outcome" => "skipped")
        .increment(skipped as u64);
    tracing::debug!(confirmed, skipped, "Recorded checkout metric");
}

/// Record a new account.
pub fn record_account_registered() {
    metrics::counter!("showtime_accounts_registered_total").increment(1);
}
