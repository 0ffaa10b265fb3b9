//! Sample catalog for empty databases.

use rand::Rng;
use rand::seq::SliceRandom;
use showtime_core::catalog::{CatalogError, CatalogStore};
use showtime_core::environment::Clock;
use showtime_core::types::{CatalogShow, CatalogTheater, NewTheater, Price};

const THEATERS: [(&str, &str, &str); 5] = [
    ("Majestic", "Chennai", "Anna Salai"),
    ("Regal", "Mumbai", "Colaba"),
    ("PVR", "Delhi", "Connaught Place"),
    ("INOX", "Bangalore", "MG Road"),
    ("Prasads", "Hyderabad", "Necklace Road"),
];

const MOVIES: [&str; 5] = ["Coolie", "Vedhalam", "Idly Kadai", "JanaNayagan", "Dhurandhar"];

const PRICES: [i64; 3] = [200, 250, 300];

const SEAT_ROWS: [char; 2] = ['A', 'B'];

const SEATS_PER_ROW: u32 = 10;

const SHOW_LENGTH_HOURS: i64 = 3;

/// What [`seed_sample_data`] inserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Theaters created
    pub theaters: usize,
    /// Shows created
    pub shows: usize,
    /// Seats created
    pub seats: usize,
}

impl SeedReport {
    /// Whether anything was inserted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.theaters == 0
    }
}

/// Insert the sample theaters, shows and seats unless the catalog already has
/// a theater.
///
/// Every movie plays once at every theater, 1 to 10 days from now, at a price
/// of 200, 250 or 300. Each show gets seats `A1`..`A10` and `B1`..`B10`.
///
/// The whole catalog is stored in one [`CatalogStore::import_catalog`] call,
/// so a failed seed leaves the catalog empty and the next start retries.
///
/// # Errors
///
/// Propagates catalog failures.
#[tracing::instrument(skip_all)]
pub async fn seed_sample_data<C, R>(
    store: &C,
    clock: &dyn Clock,
    rng: &mut R,
) -> Result<SeedReport, CatalogError>
where
    C: CatalogStore + ?Sized,
    R: Rng,
{
    if store.count_theaters().await? > 0 {
        tracing::debug!("Catalog already populated, skipping seed");
        return Ok(SeedReport::default());
    }

    let catalog = sample_catalog(clock, rng);
    let report = SeedReport {
        theaters: catalog.len(),
        shows: catalog.iter().map(|t| t.shows.len()).sum(),
        seats: catalog
            .iter()
            .flat_map(|t| &t.shows)
            .map(|s| s.seat_numbers.len())
            .sum(),
    };

    store.import_catalog(catalog).await?;

    tracing::info!(
        theaters = report.theaters,
        shows = report.shows,
        seats = report.seats,
        "Sample catalog created"
    );
    Ok(report)
}

fn sample_catalog<R: Rng>(clock: &dyn Clock, rng: &mut R) -> Vec<CatalogTheater> {
    let now = clock.now();
    let seat_numbers: Vec<String> = SEAT_ROWS
        .iter()
        .flat_map(|row| (1..=SEATS_PER_ROW).map(move |number| format!("{row}{number}")))
        .collect();

    THEATERS
        .iter()
        .map(|&(name, city, address)| CatalogTheater {
            theater: NewTheater {
                name: name.to_string(),
                city: city.to_string(),
                address: address.to_string(),
            },
            shows: MOVIES
                .iter()
                .map(|movie| {
                    let start_time = now + chrono::Duration::days(rng.gen_range(1..=10));
                    let price = PRICES.choose(rng).copied().unwrap_or(PRICES[0]);
                    CatalogShow {
                        name: (*movie).to_string(),
                        start_time,
                        end_time: start_time + chrono::Duration::hours(SHOW_LENGTH_HOURS),
                        price: Price::new(price),
                        seat_numbers: seat_numbers.clone(),
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use showtime_testing::{InMemoryCatalogStore, test_clock, test_time};

    #[tokio::test]
    async fn test_seed_populates_empty_catalog() {
        let store = InMemoryCatalogStore::new();
        let mut rng = StdRng::seed_from_u64(7);

        let report = seed_sample_data(&store, &test_clock(), &mut rng).await.unwrap();

        assert_eq!(report, SeedReport { theaters: 5, shows: 25, seats: 500 });
        assert_eq!(store.count_theaters().await.unwrap(), 5);
        assert_eq!(
            store.list_cities().await.unwrap(),
            vec!["Bangalore", "Chennai", "Delhi", "Hyderabad", "Mumbai"]
        );

        let shows = store.list_shows_by_theater_city("Chennai", 10).await.unwrap();
        assert_eq!(shows.len(), 5);
        for (show, theater) in &shows {
            assert_eq!(theater.address, "Anna Salai");
            assert!(PRICES.contains(&show.price.amount()));
            let days_out = (show.start_time - test_time()).num_days();
            assert!((1..=10).contains(&days_out));
            assert_eq!(show.end_time - show.start_time, chrono::Duration::hours(3));
        }

        let seats = store.list_seats(shows[0].0.id).await.unwrap();
        let labels: Vec<_> = seats.iter().map(|s| s.seat_number.as_str()).collect();
        assert_eq!(labels.len(), 20);
        assert_eq!(labels[0], "A1");
        assert_eq!(labels[19], "B10");
        assert!(seats.iter().all(|s| !s.is_booked));
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = InMemoryCatalogStore::new();
        let mut rng = StdRng::seed_from_u64(1);

        seed_sample_data(&store, &test_clock(), &mut rng).await.unwrap();
        let second = seed_sample_data(&store, &test_clock(), &mut rng).await.unwrap();

        assert!(second.is_empty());
        assert_eq!(store.count_theaters().await.unwrap(), 5);
    }
}
