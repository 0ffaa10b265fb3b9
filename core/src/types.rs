//! Domain types for the Showtime booking backend.
//!
//! Identifiers, catalog records (theaters, shows, seats), accounts, bookings and
//! tickets. Records are plain owned data; every mutation goes through a
//! [`CatalogStore`](crate::catalog::CatalogStore).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

/// Declares a store-assigned integer identifier.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Unique identifier for a theater
    TheaterId
);
record_id!(
    /// Unique identifier for a show (a scheduled screening)
    ShowId
);
record_id!(
    /// Unique identifier for a seat within a show
    SeatId
);
record_id!(
    /// Unique identifier for a registered user
    UserId
);
record_id!(
    /// Unique identifier for a booking
    BookingId
);
record_id!(
    /// Unique identifier for an issued ticket
    TicketId
);

// ============================================================================
// Value Objects
// ============================================================================

/// Ticket price in whole currency units (e.g. `200`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from whole currency units.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the amount in whole currency units.
    #[must_use]
    pub const fn amount(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length of every ticket code.
pub const TICKET_CODE_LEN: usize = 8;

/// Short code printed on a ticket: exactly eight uppercase ASCII alphanumerics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketCode(String);

impl TicketCode {
    /// Validate and wrap a ticket code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTicketCode`] unless the input is exactly
    /// [`TICKET_CODE_LEN`] uppercase ASCII letters or digits.
    pub fn parse(code: impl Into<String>) -> Result<Self, InvalidTicketCode> {
        let code = code.into();
        let well_formed = code.len() == TICKET_CODE_LEN
            && code
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase());
        if well_formed {
            Ok(Self(code))
        } else {
            Err(InvalidTicketCode(code))
        }
    }

    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TicketCode {
    type Err = InvalidTicketCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TicketCode {
    type Error = InvalidTicketCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TicketCode> for String {
    fn from(code: TicketCode) -> Self {
        code.0
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected ticket code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid ticket code: {0:?}")]
pub struct InvalidTicketCode(pub String);

/// Payment status of a booking.
///
/// A booking starts `Pending` (provisional claim) and moves to `Confirmed`
/// exactly once. Checkout bookings are created `Confirmed` directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Seat provisionally claimed, payment outstanding
    Pending,
    /// Payment done, seat sold
    Confirmed,
}

impl PaymentStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Catalog Records
// ============================================================================

/// A cinema in a city.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theater {
    /// Theater ID
    pub id: TheaterId,
    /// Display name (e.g. "Majestic")
    pub name: String,
    /// City the theater is in
    pub city: String,
    /// Street address
    pub address: String,
}

/// A scheduled screening of a title at one theater.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Show ID
    pub id: ShowId,
    /// Movie title
    pub name: String,
    /// Theater hosting the show
    pub theater_id: TheaterId,
    /// Start of the screening
    pub start_time: DateTime<Utc>,
    /// End of the screening
    pub end_time: DateTime<Utc>,
    /// Ticket price
    pub price: Price,
}

/// A bookable seat for one show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Seat ID
    pub id: SeatId,
    /// Show this seat belongs to
    pub show_id: ShowId,
    /// Seat label (e.g. "A1")
    pub seat_number: String,
    /// Set once a payment (or checkout) sells the seat; never reset
    pub is_booked: bool,
}

/// A registered account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A user's claim on one seat of one show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking ID
    pub id: BookingId,
    /// Owner
    pub user_id: UserId,
    /// Show booked
    pub show_id: ShowId,
    /// Seat booked
    pub seat_id: SeatId,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// When the booking was created
    pub booking_time: DateTime<Utc>,
}

impl Booking {
    /// Whether the booking has been paid for.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.payment_status == PaymentStatus::Confirmed
    }
}

/// Proof of a confirmed booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket ID
    pub id: TicketId,
    /// Booking this ticket was issued for
    pub booking_id: BookingId,
    /// Code shown at the door
    pub ticket_code: TicketCode,
}

/// A booking joined with the show and seat it refers to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    /// The booking itself
    pub booking: Booking,
    /// Title of the booked show
    pub show_name: String,
    /// Start of the booked show
    pub start_time: DateTime<Utc>,
    /// Label of the booked seat
    pub seat_number: String,
}

// ============================================================================
// Inputs
// ============================================================================

/// Data for a new theater.
#[derive(Clone, Debug)]
pub struct NewTheater {
    /// Display name
    pub name: String,
    /// City
    pub city: String,
    /// Street address
    pub address: String,
}

/// Data for a new show.
#[derive(Clone, Debug)]
pub struct NewShow {
    /// Movie title
    pub name: String,
    /// Hosting theater
    pub theater_id: TheaterId,
    /// Start of the screening
    pub start_time: DateTime<Utc>,
    /// End of the screening
    pub end_time: DateTime<Utc>,
    /// Ticket price
    pub price: Price,
}

/// Data for a new (unbooked) seat.
#[derive(Clone, Debug)]
pub struct NewSeat {
    /// Show the seat belongs to
    pub show_id: ShowId,
    /// Seat label
    pub seat_number: String,
}

/// A show to import together with its seats.
#[derive(Clone, Debug)]
pub struct CatalogShow {
    /// Movie title
    pub name: String,
    /// Start of the screening
    pub start_time: DateTime<Utc>,
    /// End of the screening
    pub end_time: DateTime<Utc>,
    /// Ticket price
    pub price: Price,
    /// Seat labels, created unbooked
    pub seat_numbers: Vec<String>,
}

/// A theater to import together with its shows.
#[derive(Clone, Debug)]
pub struct CatalogTheater {
    /// The theater itself
    pub theater: NewTheater,
    /// Shows hosted there
    pub shows: Vec<CatalogShow>,
}

/// Data for a new account.
#[derive(Clone)]
pub struct NewUser {
    /// Unique username
    pub username: String,
    /// Unique email
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Data for a new booking.
#[derive(Clone, Debug)]
pub struct NewBooking {
    /// Owner
    pub user_id: UserId,
    /// Show
    pub show_id: ShowId,
    /// Seat
    pub seat_id: SeatId,
    /// Initial payment status
    pub payment_status: PaymentStatus,
    /// Creation timestamp
    pub booking_time: DateTime<Utc>,
}
