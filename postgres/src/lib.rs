//! `PostgreSQL` catalog store for Showtime.
//!
//! This crate provides the production implementation of the
//! [`CatalogStore`] trait from `showtime-core`. It uses sqlx with runtime-checked
//! queries and supports:
//!
//! - Connection pooling with configurable limits
//! - Embedded migrations (`migrations/`)
//! - Transactional seat sales guarded by a conditional update
//!
//! # Example
//!
//! ```no_run
//! use showtime_postgres::{PoolSettings, PostgresCatalogStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresCatalogStore::connect(
//!     "postgres://localhost/showtime",
//!     &PoolSettings::default(),
//! ).await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use chrono::{DateTime, Utc};
use showtime_core::catalog::{CatalogError, CatalogFuture, CatalogStore};
use showtime_core::types::{
    Booking, BookingDetails, BookingId, CatalogTheater, NewBooking, NewSeat, NewShow, NewTheater,
    NewUser, PaymentStatus, Price, Seat, SeatId, Show, ShowId, Theater, TheaterId, Ticket,
    TicketCode, TicketId, User, UserId,
};
use sqlx::{Postgres, Row, Transaction};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use std::time::Duration;

/// Connection pool limits.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections kept open
    pub min_connections: u32,
    /// How long to wait for a connection before giving up
    pub connect_timeout: Duration,
    /// Connections idle longer than this are closed
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// `PostgreSQL`-backed catalog store.
///
/// Cloning shares the underlying pool.
#[derive(Clone, Debug)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] if the connection cannot be established.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.connect_timeout)
            .idle_timeout(settings.idle_timeout)
            .connect(database_url)
            .await
            .map_err(|e| CatalogError::Database(format!("Failed to connect: {e}")))?;

        Ok(Self::from_pool(pool))
    }

    /// Run the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), CatalogError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ============================================================================
// Row mapping
// ============================================================================

/// Map a sqlx error, turning unique violations into [`CatalogError::Conflict`].
fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> CatalogError {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return CatalogError::Conflict(format!("{context}: {db_err}"));
            }
        }
        CatalogError::Database(format!("{context}: {e}"))
    }
}

/// Abandon `tx`. A failed rollback leaves nothing committed, so it is only logged.
async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "Failed to roll back transaction");
    }
}

fn corrupt(e: sqlx::Error) -> CatalogError {
    CatalogError::Corrupt(e.to_string())
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn status_from_row(row: &PgRow) -> Result<PaymentStatus, CatalogError> {
    let raw: String = row.try_get("payment_status").map_err(corrupt)?;
    PaymentStatus::parse(&raw)
        .ok_or_else(|| CatalogError::Corrupt(format!("unknown payment status {raw:?}")))
}

fn ticket_code_from_row(row: &PgRow) -> Result<TicketCode, CatalogError> {
    let raw: String = row.try_get("ticket_code").map_err(corrupt)?;
    TicketCode::parse(raw).map_err(|e| CatalogError::Corrupt(e.to_string()))
}

fn theater_from_row(row: &PgRow) -> Result<Theater, CatalogError> {
    Ok(Theater {
        id: TheaterId::new(row.try_get("theater_id").map_err(corrupt)?),
        name: row.try_get("theater_name").map_err(corrupt)?,
        city: row.try_get("city").map_err(corrupt)?,
        address: row.try_get("address").map_err(corrupt)?,
    })
}

fn show_from_row(row: &PgRow) -> Result<Show, CatalogError> {
    Ok(Show {
        id: ShowId::new(row.try_get("id").map_err(corrupt)?),
        name: row.try_get("name").map_err(corrupt)?,
        theater_id: TheaterId::new(row.try_get("theater_id").map_err(corrupt)?),
        start_time: row.try_get("start_time").map_err(corrupt)?,
        end_time: row.try_get("end_time").map_err(corrupt)?,
        price: Price::new(row.try_get("price").map_err(corrupt)?),
    })
}

fn seat_from_row(row: &PgRow) -> Result<Seat, CatalogError> {
    Ok(Seat {
        id: SeatId::new(row.try_get("id").map_err(corrupt)?),
        show_id: ShowId::new(row.try_get("show_id").map_err(corrupt)?),
        seat_number: row.try_get("seat_number").map_err(corrupt)?,
        is_booked: row.try_get("is_booked").map_err(corrupt)?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, CatalogError> {
    Ok(User {
        id: UserId::new(row.try_get("id").map_err(corrupt)?),
        username: row.try_get("username").map_err(corrupt)?,
        email: row.try_get("email").map_err(corrupt)?,
        password_hash: row.try_get("password_hash").map_err(corrupt)?,
    })
}

fn booking_from_row(row: &PgRow) -> Result<Booking, CatalogError> {
    Ok(Booking {
        id: BookingId::new(row.try_get("id").map_err(corrupt)?),
        user_id: UserId::new(row.try_get("user_id").map_err(corrupt)?),
        show_id: ShowId::new(row.try_get("show_id").map_err(corrupt)?),
        seat_id: SeatId::new(row.try_get("seat_id").map_err(corrupt)?),
        payment_status: status_from_row(row)?,
        booking_time: row.try_get("booking_time").map_err(corrupt)?,
    })
}

fn ticket_from_row(row: &PgRow) -> Result<Ticket, CatalogError> {
    Ok(Ticket {
        id: TicketId::new(row.try_get("id").map_err(corrupt)?),
        booking_id: BookingId::new(row.try_get("booking_id").map_err(corrupt)?),
        ticket_code: ticket_code_from_row(row)?,
    })
}

const SHOW_COLUMNS: &str = "id, name, theater_id, start_time, end_time, price";
const BOOKING_COLUMNS: &str = "id, user_id, show_id, seat_id, payment_status, booking_time";

// ============================================================================
// CatalogStore
// ============================================================================

impl CatalogStore for PostgresCatalogStore {
    fn get_theater(&self, id: TheaterId) -> CatalogFuture<'_, Option<Theater>> {
        Box::pin(async move {
            sqlx::query(
                "SELECT id AS theater_id, name AS theater_name, city, address FROM theaters WHERE id = $1",
            )
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get theater"))?
            .as_ref()
            .map(theater_from_row)
            .transpose()
        })
    }

    fn get_show(&self, id: ShowId) -> CatalogFuture<'_, Option<Show>> {
        Box::pin(async move {
            sqlx::query(&format!("SELECT {SHOW_COLUMNS} FROM shows WHERE id = $1"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to get show"))?
                .as_ref()
                .map(show_from_row)
                .transpose()
        })
    }

    fn get_seat(&self, id: SeatId) -> CatalogFuture<'_, Option<Seat>> {
        Box::pin(async move {
            sqlx::query("SELECT id, show_id, seat_number, is_booked FROM seats WHERE id = $1")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to get seat"))?
                .as_ref()
                .map(seat_from_row)
                .transpose()
        })
    }

    fn list_shows_by_theater_city<'a>(
        &'a self,
        city: &'a str,
        limit: usize,
    ) -> CatalogFuture<'a, Vec<(Show, Theater)>> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT s.id, s.name, s.theater_id, s.start_time, s.end_time, s.price,
                       t.name AS theater_name, t.city, t.address
                FROM shows s
                JOIN theaters t ON t.id = s.theater_id
                WHERE t.city = $1
                ORDER BY s.id
                LIMIT $2
                ",
            )
            .bind(city)
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list shows"))?;

            rows.iter()
                .map(|row| Ok((show_from_row(row)?, theater_from_row(row)?)))
                .collect()
        })
    }

    fn list_seats(&self, show_id: ShowId) -> CatalogFuture<'_, Vec<Seat>> {
        Box::pin(async move {
            let rows = sqlx::query(
                "SELECT id, show_id, seat_number, is_booked FROM seats WHERE show_id = $1 ORDER BY id",
            )
            .bind(show_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list seats"))?;

            rows.iter().map(seat_from_row).collect()
        })
    }

    fn list_cities(&self) -> CatalogFuture<'_, Vec<String>> {
        Box::pin(async move {
            let rows: Vec<(String,)> =
                sqlx::query_as("SELECT DISTINCT city FROM theaters ORDER BY city")
                    .fetch_all(&self.pool)
                    .await
                    .map_err(db_error("Failed to list cities"))?;
            Ok(rows.into_iter().map(|(city,)| city).collect())
        })
    }

    fn count_theaters(&self) -> CatalogFuture<'_, u64> {
        Box::pin(async move {
            let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM theaters")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count theaters"))?;
            u64::try_from(count).map_err(|e| CatalogError::Corrupt(e.to_string()))
        })
    }

    fn create_theater(&self, theater: NewTheater) -> CatalogFuture<'_, Theater> {
        Box::pin(async move {
            let (id,): (i64,) = sqlx::query_as(
                "INSERT INTO theaters (name, city, address) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(&theater.name)
            .bind(&theater.city)
            .bind(&theater.address)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create theater"))?;

            Ok(Theater {
                id: TheaterId::new(id),
                name: theater.name,
                city: theater.city,
                address: theater.address,
            })
        })
    }

    fn create_show(&self, show: NewShow) -> CatalogFuture<'_, Show> {
        Box::pin(async move {
            let (id,): (i64,) = sqlx::query_as(
                r"
                INSERT INTO shows (name, theater_id, start_time, end_time, price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                ",
            )
            .bind(&show.name)
            .bind(show.theater_id.get())
            .bind(show.start_time)
            .bind(show.end_time)
            .bind(show.price.amount())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create show"))?;

            Ok(Show {
                id: ShowId::new(id),
                name: show.name,
                theater_id: show.theater_id,
                start_time: show.start_time,
                end_time: show.end_time,
                price: show.price,
            })
        })
    }

    fn create_seat(&self, seat: NewSeat) -> CatalogFuture<'_, Seat> {
        Box::pin(async move {
            let (id,): (i64,) = sqlx::query_as(
                "INSERT INTO seats (show_id, seat_number) VALUES ($1, $2) RETURNING id",
            )
            .bind(seat.show_id.get())
            .bind(&seat.seat_number)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create seat"))?;

            Ok(Seat {
                id: SeatId::new(id),
                show_id: seat.show_id,
                seat_number: seat.seat_number,
                is_booked: false,
            })
        })
    }

    #[tracing::instrument(skip_all, fields(theaters = theaters.len()), level = "debug")]
    fn import_catalog(&self, theaters: Vec<CatalogTheater>) -> CatalogFuture<'_, ()> {
        Box::pin(async move {
            // Any early return drops `tx`, which rolls the whole import back.
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(db_error("Failed to start transaction"))?;

            for CatalogTheater { theater, shows } in theaters {
                let (theater_id,): (i64,) = sqlx::query_as(
                    "INSERT INTO theaters (name, city, address) VALUES ($1, $2, $3) RETURNING id",
                )
                .bind(&theater.name)
                .bind(&theater.city)
                .bind(&theater.address)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("Failed to create theater"))?;

                for show in shows {
                    let (show_id,): (i64,) = sqlx::query_as(
                        r"
                        INSERT INTO shows (name, theater_id, start_time, end_time, price)
                        VALUES ($1, $2, $3, $4, $5)
                        RETURNING id
                        ",
                    )
                    .bind(&show.name)
                    .bind(theater_id)
                    .bind(show.start_time)
                    .bind(show.end_time)
                    .bind(show.price.amount())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(db_error("Failed to create show"))?;

                    sqlx::query(
                        "INSERT INTO seats (show_id, seat_number) SELECT $1, UNNEST($2::TEXT[])",
                    )
                    .bind(show_id)
                    .bind(show.seat_numbers.as_slice())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error("Failed to create seats"))?;
                }
            }

            tx.commit()
                .await
                .map_err(db_error("Failed to commit catalog import"))
        })
    }

    fn create_user(&self, user: NewUser) -> CatalogFuture<'_, User> {
        Box::pin(async move {
            let (id,): (i64,) = sqlx::query_as(
                "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create user"))?;

            Ok(User {
                id: UserId::new(id),
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
            })
        })
    }

    fn find_user_by_email<'a>(&'a self, email: &'a str) -> CatalogFuture<'a, Option<User>> {
        Box::pin(async move {
            sqlx::query("SELECT id, username, email, password_hash FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find user"))?
                .as_ref()
                .map(user_from_row)
                .transpose()
        })
    }

    fn create_booking(&self, booking: NewBooking) -> CatalogFuture<'_, Booking> {
        Box::pin(async move {
            let (id,): (i64,) = sqlx::query_as(
                r"
                INSERT INTO bookings (user_id, show_id, seat_id, payment_status, booking_time)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                ",
            )
            .bind(booking.user_id.get())
            .bind(booking.show_id.get())
            .bind(booking.seat_id.get())
            .bind(booking.payment_status.as_str())
            .bind(booking.booking_time)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create booking"))?;

            Ok(booking_with_id(BookingId::new(id), booking))
        })
    }

    fn get_booking(&self, id: BookingId) -> CatalogFuture<'_, Option<Booking>> {
        Box::pin(async move {
            sqlx::query(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to get booking"))?
                .as_ref()
                .map(booking_from_row)
                .transpose()
        })
    }

    fn update_booking_status(
        &self,
        id: BookingId,
        status: PaymentStatus,
    ) -> CatalogFuture<'_, bool> {
        Box::pin(async move {
            let result = sqlx::query("UPDATE bookings SET payment_status = $2 WHERE id = $1")
                .bind(id.get())
                .bind(status.as_str())
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to update booking"))?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn create_ticket(&self, booking_id: BookingId, code: TicketCode) -> CatalogFuture<'_, Ticket> {
        Box::pin(async move {
            let (id,): (i64,) = sqlx::query_as(
                "INSERT INTO tickets (booking_id, ticket_code) VALUES ($1, $2) RETURNING id",
            )
            .bind(booking_id.get())
            .bind(code.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create ticket"))?;

            Ok(Ticket {
                id: TicketId::new(id),
                booking_id,
                ticket_code: code,
            })
        })
    }

    fn ticket_for_booking(&self, booking_id: BookingId) -> CatalogFuture<'_, Option<Ticket>> {
        Box::pin(async move {
            sqlx::query("SELECT id, booking_id, ticket_code FROM tickets WHERE booking_id = $1")
                .bind(booking_id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to get ticket"))?
                .as_ref()
                .map(ticket_from_row)
                .transpose()
        })
    }

    #[tracing::instrument(skip(self), level = "debug")]
    fn conditionally_mark_seat_booked(&self, seat_id: SeatId) -> CatalogFuture<'_, bool> {
        Box::pin(async move {
            let result =
                sqlx::query("UPDATE seats SET is_booked = TRUE WHERE id = $1 AND is_booked = FALSE")
                    .bind(seat_id.get())
                    .execute(&self.pool)
                    .await
                    .map_err(db_error("Failed to mark seat booked"))?;
            Ok(result.rows_affected() == 1)
        })
    }

    #[tracing::instrument(skip(self, code), level = "debug")]
    fn confirm_booking(
        &self,
        booking_id: BookingId,
        code: TicketCode,
    ) -> CatalogFuture<'_, Option<Ticket>> {
        Box::pin(async move {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(db_error("Failed to start transaction"))?;

            // Lock the booking row so two payments for it serialize here.
            let booking = sqlx::query(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
            ))
            .bind(booking_id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to lock booking"))?
            .as_ref()
            .map(booking_from_row)
            .transpose()?;

            let Some(booking) = booking.filter(|b| b.payment_status == PaymentStatus::Pending)
            else {
                rollback(tx).await;
                return Ok(None);
            };

            let claimed =
                sqlx::query("UPDATE seats SET is_booked = TRUE WHERE id = $1 AND is_booked = FALSE")
                    .bind(booking.seat_id.get())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error("Failed to mark seat booked"))?;

            if claimed.rows_affected() == 0 {
                tracing::debug!(seat_id = %booking.seat_id, "Seat already sold, rolling back");
                rollback(tx).await;
                return Ok(None);
            }

            sqlx::query(
                "UPDATE bookings SET payment_status = 'confirmed' WHERE id = $1 AND payment_status = 'pending'",
            )
            .bind(booking_id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to confirm booking"))?;

            let (ticket_id,): (i64,) = sqlx::query_as(
                "INSERT INTO tickets (booking_id, ticket_code) VALUES ($1, $2) RETURNING id",
            )
            .bind(booking_id.get())
            .bind(code.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to issue ticket"))?;

            tx.commit()
                .await
                .map_err(db_error("Failed to commit transaction"))?;

            Ok(Some(Ticket {
                id: TicketId::new(ticket_id),
                booking_id,
                ticket_code: code,
            }))
        })
    }

    #[tracing::instrument(skip(self, booking), fields(seat_id = %booking.seat_id), level = "debug")]
    fn book_seat(&self, booking: NewBooking) -> CatalogFuture<'_, Option<Booking>> {
        Box::pin(async move {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(db_error("Failed to start transaction"))?;

            let claimed = sqlx::query(
                "UPDATE seats SET is_booked = TRUE WHERE id = $1 AND show_id = $2 AND is_booked = FALSE",
            )
            .bind(booking.seat_id.get())
            .bind(booking.show_id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to mark seat booked"))?;

            if claimed.rows_affected() == 0 {
                rollback(tx).await;
                return Ok(None);
            }

            let (id,): (i64,) = sqlx::query_as(
                r"
                INSERT INTO bookings (user_id, show_id, seat_id, payment_status, booking_time)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                ",
            )
            .bind(booking.user_id.get())
            .bind(booking.show_id.get())
            .bind(booking.seat_id.get())
            .bind(booking.payment_status.as_str())
            .bind(booking.booking_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to create booking"))?;

            tx.commit()
                .await
                .map_err(db_error("Failed to commit transaction"))?;

            Ok(Some(booking_with_id(BookingId::new(id), booking)))
        })
    }

    fn list_user_bookings(&self, user_id: UserId) -> CatalogFuture<'_, Vec<BookingDetails>> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT b.id, b.user_id, b.show_id, b.seat_id, b.payment_status, b.booking_time,
                       s.name AS show_name, s.start_time, st.seat_number
                FROM bookings b
                JOIN shows s ON s.id = b.show_id
                JOIN seats st ON st.id = b.seat_id
                WHERE b.user_id = $1
                ORDER BY b.id
                ",
            )
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list bookings"))?;

            rows.iter()
                .map(|row| {
                    let start_time: DateTime<Utc> = row.try_get("start_time").map_err(corrupt)?;
                    Ok(BookingDetails {
                        booking: booking_from_row(row)?,
                        show_name: row.try_get("show_name").map_err(corrupt)?,
                        start_time,
                        seat_number: row.try_get("seat_number").map_err(corrupt)?,
                    })
                })
                .collect()
        })
    }
}

fn booking_with_id(id: BookingId, booking: NewBooking) -> Booking {
    Booking {
        id,
        user_id: booking.user_id,
        show_id: booking.show_id,
        seat_id: booking.seat_id,
        payment_status: booking.payment_status,
        booking_time: booking.booking_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_param_saturates() {
        assert_eq!(limit_param(10), 10);
        assert_eq!(limit_param(usize::MAX), i64::MAX);
    }

    #[test]
    fn test_default_pool_settings() {
        let settings = PoolSettings::default();
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.min_connections, 2);
        assert_eq!(settings.idle_timeout, Duration::from_secs(600));
    }
}
