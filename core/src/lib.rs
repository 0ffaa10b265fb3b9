//! # Showtime Core
//!
//! Domain types and storage contracts for the Showtime movie-ticket booking backend.
//!
//! ## Core Concepts
//!
//! - **Catalog**: theaters, shows and seats, plus users, bookings and tickets,
//!   all persisted behind the [`catalog::CatalogStore`] trait
//! - **Booking**: a user's claim on a seat, `pending` until paid, then `confirmed`
//! - **Ticket**: issued exactly once when a booking is paid for
//! - **Environment**: injected capabilities (clock, ticket codes, current user)
//!
//! ## Example
//!
//! ```
//! use showtime_core::environment::{CurrentUser, TicketCodeGenerator, UuidTicketCodes};
//! use showtime_core::types::UserId;
//!
//! let code = UuidTicketCodes.next_code();
//! assert_eq!(code.as_str().len(), 8);
//!
//! let anonymous: Option<UserId> = None;
//! assert!(anonymous.current_user_id().is_none());
//! ```

pub mod catalog;
pub mod types;

// Re-export commonly used types
pub use catalog::{CatalogError, CatalogFuture, CatalogStore};
pub use chrono::{DateTime, Utc};

/// Environment module - Dependency injection traits
///
/// Everything the booking core needs from the outside world (time, randomness,
/// the authenticated caller) is abstracted behind a trait so tests can pin it.
pub mod environment {
    use crate::types::{TICKET_CODE_LEN, TicketCode, UserId};
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use showtime_core::environment::{Clock, SystemClock};
    ///
    /// let now = SystemClock.now();
    /// assert!(now.timestamp() > 0);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh ticket codes.
    pub trait TicketCodeGenerator: Send + Sync {
        /// Produce a new code. Uniqueness is enforced by the store.
        fn next_code(&self) -> TicketCode;
    }

    /// Codes taken from the first eight hex digits of a random UUID v4, upper-cased.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidTicketCodes;

    impl TicketCodeGenerator for UuidTicketCodes {
        fn next_code(&self) -> TicketCode {
            let mut code = uuid::Uuid::new_v4().simple().to_string();
            code.truncate(TICKET_CODE_LEN);
            code.make_ascii_uppercase();
            // Hex digits upper-cased are always a well-formed code.
            TicketCode::parse(code).unwrap_or_else(|rejected| {
                unreachable!("uuid hex prefix rejected as ticket code: {rejected}")
            })
        }
    }

    /// Identity capability: who is making this call, if anyone.
    pub trait CurrentUser {
        /// The authenticated caller, or `None` for anonymous requests.
        fn current_user_id(&self) -> Option<UserId>;
    }

    impl CurrentUser for UserId {
        fn current_user_id(&self) -> Option<UserId> {
            Some(*self)
        }
    }

    impl CurrentUser for Option<UserId> {
        fn current_user_id(&self) -> Option<UserId> {
            *self
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn uuid_codes_are_always_well_formed(_seed in 0u32..256) {
                let code = UuidTicketCodes.next_code();
                prop_assert_eq!(code.as_str().len(), TICKET_CODE_LEN);
                prop_assert!(code
                    .as_str()
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
            }
        }

        #[test]
        fn test_consecutive_codes_differ() {
            let a = UuidTicketCodes.next_code();
            let b = UuidTicketCodes.next_code();
            assert_ne!(a, b);
        }

        #[test]
        fn test_current_user_impls() {
            assert_eq!(UserId::new(7).current_user_id(), Some(UserId::new(7)));
            assert_eq!(None::<UserId>.current_user_id(), None);
        }
    }
}
