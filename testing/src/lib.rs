//! # Showtime Testing
//!
//! Testing utilities and helpers for the Showtime booking backend.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (clocks, ticket codes)
//! - [`InMemoryCatalogStore`], a `HashMap`-backed [`CatalogStore`](showtime_core::CatalogStore)
//! - Catalog fixtures for common scenarios
//!
//! ## Example
//!
//! ```
//! use showtime_testing::{InMemoryCatalogStore, fixtures::CatalogFixture};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryCatalogStore::new();
//! let fixture = CatalogFixture::chennai(&store).await?;
//! assert_eq!(fixture.seats.len(), 3);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Duration, Utc};
use showtime_core::environment::{Clock, TicketCodeGenerator};
use showtime_core::types::TicketCode;

pub mod catalog_mocks;
pub mod fixtures;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Duration, TicketCode, TicketCodeGenerator, Utc};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use showtime_testing::mocks::FixedClock;
    /// use showtime_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to, for TTL and expiry tests.
    ///
    /// # Example
    ///
    /// ```
    /// use showtime_testing::mocks::{ManualClock, test_time};
    /// use showtime_core::environment::Clock;
    /// use chrono::Duration;
    ///
    /// let clock = ManualClock::new(test_time());
    /// clock.advance(Duration::seconds(301));
    /// assert_eq!(clock.now(), test_time() + Duration::seconds(301));
    /// ```
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a clock stopped at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward
        #[allow(clippy::unwrap_used)]
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap();
            *time += by;
        }
    }

    impl Clock for ManualClock {
        #[allow(clippy::unwrap_used)]
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap()
        }
    }

    /// Predictable ticket codes: `TKT00001`, `TKT00002`, ...
    #[derive(Debug, Default)]
    pub struct SequentialTicketCodes {
        next: AtomicU32,
    }

    impl SequentialTicketCodes {
        /// Create a generator starting at `TKT00001`
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU32::new(1),
            }
        }
    }

    impl TicketCodeGenerator for SequentialTicketCodes {
        #[allow(clippy::expect_used)]
        fn next_code(&self) -> TicketCode {
            let n = self.next.fetch_add(1, Ordering::SeqCst) % 100_000;
            TicketCode::parse(format!("TKT{n:05}")).expect("sequential codes are well formed")
        }
    }

    /// The reference instant used across tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_time())
    }
}

// Re-export commonly used items
pub use catalog_mocks::InMemoryCatalogStore;
pub use mocks::{FixedClock, ManualClock, SequentialTicketCodes, test_clock, test_time};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(test_time());
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now() - test_time(), Duration::minutes(5));
    }

    #[test]
    fn test_sequential_codes() {
        let codes = SequentialTicketCodes::new();
        assert_eq!(codes.next_code().as_str(), "TKT00001");
        assert_eq!(codes.next_code().as_str(), "TKT00002");
    }
}
