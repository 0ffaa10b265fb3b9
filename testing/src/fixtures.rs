//! Ready-made catalog scenarios.
//!
//! Fixtures go through the [`CatalogStore`] trait, so they work against any
//! backend (the in-memory store in unit tests, `PostgreSQL` in integration tests).

use crate::mocks::test_time;
use chrono::Duration;
use showtime_core::catalog::{CatalogError, CatalogStore};
use showtime_core::types::{NewSeat, NewShow, NewTheater, Price, Seat, Show, Theater};

/// A theater with one show and a handful of seats.
#[derive(Clone, Debug)]
pub struct CatalogFixture {
    /// The theater
    pub theater: Theater,
    /// Its single show
    pub show: Show,
    /// The show's seats, in creation order
    pub seats: Vec<Seat>,
}

impl CatalogFixture {
    /// Majestic in Chennai, showing "Coolie" at 200 with seats A1..A3.
    ///
    /// The show starts one day after [`test_time`].
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn chennai<C: CatalogStore + ?Sized>(store: &C) -> Result<Self, CatalogError> {
        let theater = store
            .create_theater(NewTheater {
                name: "Majestic".into(),
                city: "Chennai".into(),
                address: "Anna Salai".into(),
            })
            .await?;
        let show = add_show(store, &theater, "Coolie", 1).await?;
        let seats = add_seats(store, &show, &["A1", "A2", "A3"]).await?;

        Ok(Self {
            theater,
            show,
            seats,
        })
    }
}

/// Add a two-hour show priced at 200, starting `days_out` days after [`test_time`].
///
/// # Errors
///
/// Propagates store failures.
pub async fn add_show<C: CatalogStore + ?Sized>(
    store: &C,
    theater: &Theater,
    name: &str,
    days_out: i64,
) -> Result<Show, CatalogError> {
    let start_time = test_time() + Duration::days(days_out);
    store
        .create_show(NewShow {
            name: name.to_string(),
            theater_id: theater.id,
            start_time,
            end_time: start_time + Duration::hours(2),
            price: Price::new(200),
        })
        .await
}

/// Add seats with the given labels to a show.
///
/// # Errors
///
/// Propagates store failures.
pub async fn add_seats<C: CatalogStore + ?Sized>(
    store: &C,
    show: &Show,
    labels: &[&str],
) -> Result<Vec<Seat>, CatalogError> {
    let mut seats = Vec::with_capacity(labels.len());
    for label in labels {
        seats.push(
            store
                .create_seat(NewSeat {
                    show_id: show.id,
                    seat_number: (*label).to_string(),
                })
                .await?,
        );
    }
    Ok(seats)
}
