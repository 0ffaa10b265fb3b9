//! In-memory catalog store for fast, deterministic testing.
//!
//! Every operation runs under a single `RwLock`, so the compound units of work
//! (`confirm_booking`, `book_seat`) are atomic with respect to each other just
//! like their transactional `PostgreSQL` counterparts.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use showtime_core::catalog::{CatalogError, CatalogFuture, CatalogStore};
use showtime_core::types::{
    Booking, BookingDetails, BookingId, CatalogTheater, NewBooking, NewSeat, NewShow, NewTheater,
    NewUser, PaymentStatus, Seat, SeatId, Show, ShowId, Theater, TheaterId, Ticket, TicketCode,
    TicketId, User, UserId,
};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    theaters: BTreeMap<TheaterId, Theater>,
    shows: BTreeMap<ShowId, Show>,
    seats: BTreeMap<SeatId, Seat>,
    users: BTreeMap<UserId, User>,
    bookings: BTreeMap<BookingId, Booking>,
    tickets: BTreeMap<TicketId, Ticket>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn mark_seat_booked(&mut self, seat_id: SeatId, show_id: Option<ShowId>) -> bool {
        match self.seats.get_mut(&seat_id) {
            Some(seat) if !seat.is_booked && show_id.is_none_or(|id| seat.show_id == id) => {
                seat.is_booked = true;
                true
            }
            _ => false,
        }
    }

    fn insert_ticket(
        &mut self,
        booking_id: BookingId,
        code: TicketCode,
    ) -> Result<Ticket, CatalogError> {
        if self.tickets.values().any(|t| t.ticket_code == code) {
            return Err(CatalogError::Conflict(format!("ticket code {code} already issued")));
        }
        if self.tickets.values().any(|t| t.booking_id == booking_id) {
            return Err(CatalogError::Conflict(format!(
                "booking {booking_id} already has a ticket"
            )));
        }
        let ticket = Ticket {
            id: TicketId::new(self.allocate_id()),
            booking_id,
            ticket_code: code,
        };
        self.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    fn insert_booking(&mut self, booking: NewBooking) -> Booking {
        let booking = Booking {
            id: BookingId::new(self.allocate_id()),
            user_id: booking.user_id,
            show_id: booking.show_id,
            seat_id: booking.seat_id,
            payment_status: booking.payment_status,
            booking_time: booking.booking_time,
        };
        self.bookings.insert(booking.id, booking.clone());
        booking
    }
}

/// `HashMap`-style catalog store for tests and local experiments.
///
/// Cloning is cheap and clones share the same tables.
///
/// # Example
///
/// ```
/// use showtime_testing::InMemoryCatalogStore;
/// use showtime_core::catalog::CatalogStore;
/// use showtime_core::types::NewTheater;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryCatalogStore::new();
/// store.create_theater(NewTheater {
///     name: "Majestic".into(),
///     city: "Chennai".into(),
///     address: "Anna Salai".into(),
/// }).await?;
/// assert_eq!(store.list_cities().await?, vec!["Chennai".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalogStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalogStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bookings referencing `seat_id` with the given status.
    ///
    /// Useful for double-booking assertions.
    #[must_use]
    pub fn bookings_for_seat(&self, seat_id: SeatId, status: PaymentStatus) -> usize {
        self.tables
            .read()
            .unwrap()
            .bookings
            .values()
            .filter(|b| b.seat_id == seat_id && b.payment_status == status)
            .count()
    }

    /// Every ticket issued so far, in issue order.
    #[must_use]
    pub fn tickets(&self) -> Vec<Ticket> {
        self.tables.read().unwrap().tickets.values().cloned().collect()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn get_theater(&self, id: TheaterId) -> CatalogFuture<'_, Option<Theater>> {
        let theater = self.tables.read().unwrap().theaters.get(&id).cloned();
        Box::pin(async move { Ok(theater) })
    }

    fn get_show(&self, id: ShowId) -> CatalogFuture<'_, Option<Show>> {
        let show = self.tables.read().unwrap().shows.get(&id).cloned();
        Box::pin(async move { Ok(show) })
    }

    fn get_seat(&self, id: SeatId) -> CatalogFuture<'_, Option<Seat>> {
        let seat = self.tables.read().unwrap().seats.get(&id).cloned();
        Box::pin(async move { Ok(seat) })
    }

    fn list_shows_by_theater_city<'a>(
        &'a self,
        city: &'a str,
        limit: usize,
    ) -> CatalogFuture<'a, Vec<(Show, Theater)>> {
        let rows = {
            let tables = self.tables.read().unwrap();
            tables
                .shows
                .values()
                .filter_map(|show| {
                    tables
                        .theaters
                        .get(&show.theater_id)
                        .filter(|theater| theater.city == city)
                        .map(|theater| (show.clone(), theater.clone()))
                })
                .take(limit)
                .collect()
        };
        Box::pin(async move { Ok(rows) })
    }

    fn list_seats(&self, show_id: ShowId) -> CatalogFuture<'_, Vec<Seat>> {
        let seats = self
            .tables
            .read()
            .unwrap()
            .seats
            .values()
            .filter(|s| s.show_id == show_id)
            .cloned()
            .collect();
        Box::pin(async move { Ok(seats) })
    }

    fn list_cities(&self) -> CatalogFuture<'_, Vec<String>> {
        let mut cities: Vec<String> = self
            .tables
            .read()
            .unwrap()
            .theaters
            .values()
            .map(|t| t.city.clone())
            .collect();
        cities.sort();
        cities.dedup();
        Box::pin(async move { Ok(cities) })
    }

    fn count_theaters(&self) -> CatalogFuture<'_, u64> {
        let count = self.tables.read().unwrap().theaters.len() as u64;
        Box::pin(async move { Ok(count) })
    }

    fn create_theater(&self, theater: NewTheater) -> CatalogFuture<'_, Theater> {
        let mut tables = self.tables.write().unwrap();
        let theater = Theater {
            id: TheaterId::new(tables.allocate_id()),
            name: theater.name,
            city: theater.city,
            address: theater.address,
        };
        tables.theaters.insert(theater.id, theater.clone());
        Box::pin(async move { Ok(theater) })
    }

    fn create_show(&self, show: NewShow) -> CatalogFuture<'_, Show> {
        let mut tables = self.tables.write().unwrap();
        let show = Show {
            id: ShowId::new(tables.allocate_id()),
            name: show.name,
            theater_id: show.theater_id,
            start_time: show.start_time,
            end_time: show.end_time,
            price: show.price,
        };
        tables.shows.insert(show.id, show.clone());
        Box::pin(async move { Ok(show) })
    }

    fn create_seat(&self, seat: NewSeat) -> CatalogFuture<'_, Seat> {
        let mut tables = self.tables.write().unwrap();
        let seat = Seat {
            id: SeatId::new(tables.allocate_id()),
            show_id: seat.show_id,
            seat_number: seat.seat_number,
            is_booked: false,
        };
        tables.seats.insert(seat.id, seat.clone());
        Box::pin(async move { Ok(seat) })
    }

    fn import_catalog(&self, theaters: Vec<CatalogTheater>) -> CatalogFuture<'_, ()> {
        let mut tables = self.tables.write().unwrap();
        for CatalogTheater { theater, shows } in theaters {
            let theater_id = TheaterId::new(tables.allocate_id());
            tables.theaters.insert(
                theater_id,
                Theater {
                    id: theater_id,
                    name: theater.name,
                    city: theater.city,
                    address: theater.address,
                },
            );
            for show in shows {
                let show_id = ShowId::new(tables.allocate_id());
                tables.shows.insert(
                    show_id,
                    Show {
                        id: show_id,
                        name: show.name,
                        theater_id,
                        start_time: show.start_time,
                        end_time: show.end_time,
                        price: show.price,
                    },
                );
                for seat_number in show.seat_numbers {
                    let seat_id = SeatId::new(tables.allocate_id());
                    tables.seats.insert(
                        seat_id,
                        Seat {
                            id: seat_id,
                            show_id,
                            seat_number,
                            is_booked: false,
                        },
                    );
                }
            }
        }
        Box::pin(async move { Ok(()) })
    }

    fn create_user(&self, user: NewUser) -> CatalogFuture<'_, User> {
        let result = {
            let mut tables = self.tables.write().unwrap();
            let taken = tables
                .users
                .values()
                .any(|u| u.email == user.email || u.username == user.username);
            if taken {
                Err(CatalogError::Conflict(format!(
                    "user {} <{}> already exists",
                    user.username, user.email
                )))
            } else {
                let user = User {
                    id: UserId::new(tables.allocate_id()),
                    username: user.username,
                    email: user.email,
                    password_hash: user.password_hash,
                };
                tables.users.insert(user.id, user.clone());
                Ok(user)
            }
        };
        Box::pin(async move { result })
    }

    fn find_user_by_email<'a>(&'a self, email: &'a str) -> CatalogFuture<'a, Option<User>> {
        let user = self
            .tables
            .read()
            .unwrap()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned();
        Box::pin(async move { Ok(user) })
    }

    fn create_booking(&self, booking: NewBooking) -> CatalogFuture<'_, Booking> {
        let booking = self.tables.write().unwrap().insert_booking(booking);
        Box::pin(async move { Ok(booking) })
    }

    fn get_booking(&self, id: BookingId) -> CatalogFuture<'_, Option<Booking>> {
        let booking = self.tables.read().unwrap().bookings.get(&id).cloned();
        Box::pin(async move { Ok(booking) })
    }

    fn update_booking_status(
        &self,
        id: BookingId,
        status: PaymentStatus,
    ) -> CatalogFuture<'_, bool> {
        let updated = self
            .tables
            .write()
            .unwrap()
            .bookings
            .get_mut(&id)
            .map(|b| b.payment_status = status)
            .is_some();
        Box::pin(async move { Ok(updated) })
    }

    fn create_ticket(&self, booking_id: BookingId, code: TicketCode) -> CatalogFuture<'_, Ticket> {
        let result = self.tables.write().unwrap().insert_ticket(booking_id, code);
        Box::pin(async move { result })
    }

    fn ticket_for_booking(&self, booking_id: BookingId) -> CatalogFuture<'_, Option<Ticket>> {
        let ticket = self
            .tables
            .read()
            .unwrap()
            .tickets
            .values()
            .find(|t| t.booking_id == booking_id)
            .cloned();
        Box::pin(async move { Ok(ticket) })
    }

    fn conditionally_mark_seat_booked(&self, seat_id: SeatId) -> CatalogFuture<'_, bool> {
        let flipped = self.tables.write().unwrap().mark_seat_booked(seat_id, None);
        Box::pin(async move { Ok(flipped) })
    }

    fn confirm_booking(
        &self,
        booking_id: BookingId,
        code: TicketCode,
    ) -> CatalogFuture<'_, Option<Ticket>> {
        let result = {
            let mut tables = self.tables.write().unwrap();
            match tables.bookings.get(&booking_id).cloned() {
                Some(booking) if booking.payment_status == PaymentStatus::Pending => {
                    let code_taken = tables.tickets.values().any(|t| t.ticket_code == code);
                    if code_taken {
                        Err(CatalogError::Conflict(format!("ticket code {code} already issued")))
                    } else if tables.mark_seat_booked(booking.seat_id, None) {
                        if let Some(b) = tables.bookings.get_mut(&booking_id) {
                            b.payment_status = PaymentStatus::Confirmed;
                        }
                        tables.insert_ticket(booking_id, code).map(Some)
                    } else {
                        Ok(None)
                    }
                }
                _ => Ok(None),
            }
        };
        Box::pin(async move { result })
    }

    fn book_seat(&self, booking: NewBooking) -> CatalogFuture<'_, Option<Booking>> {
        let booking = {
            let mut tables = self.tables.write().unwrap();
            tables
                .mark_seat_booked(booking.seat_id, Some(booking.show_id))
                .then(|| tables.insert_booking(booking))
        };
        Box::pin(async move { Ok(booking) })
    }

    fn list_user_bookings(&self, user_id: UserId) -> CatalogFuture<'_, Vec<BookingDetails>> {
        let details = {
            let tables = self.tables.read().unwrap();
            tables
                .bookings
                .values()
                .filter(|b| b.user_id == user_id)
                .filter_map(|booking| {
                    let show = tables.shows.get(&booking.show_id)?;
                    let seat = tables.seats.get(&booking.seat_id)?;
                    Some(BookingDetails {
                        booking: booking.clone(),
                        show_name: show.name.clone(),
                        start_time: show.start_time,
                        seat_number: seat.seat_number.clone(),
                    })
                })
                .collect()
        };
        Box::pin(async move { Ok(details) })
    }
}
