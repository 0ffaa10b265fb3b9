//! Listing cache behaviour over a real listing query.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use proptest::prelude::*;
use showtime::cache::{CacheStatus, ListingCache};
use showtime::listing::{DEFAULT_MAX_RESULTS, ListingQuery};
use showtime_core::catalog::CatalogStore;
use showtime_testing::fixtures::{CatalogFixture, add_show};
use showtime_testing::{InMemoryCatalogStore, ManualClock, test_time};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

async fn setup() -> (InMemoryCatalogStore, ListingQuery, ListingCache, Arc<ManualClock>) {
    let store = InMemoryCatalogStore::new();
    CatalogFixture::chennai(&store).await.unwrap();
    let clock = Arc::new(ManualClock::new(test_time()));
    let cache = ListingCache::new(clock.clone(), Duration::from_secs(300));
    let query = ListingQuery::new(Arc::new(store.clone()), DEFAULT_MAX_RESULTS);
    (store, query, cache, clock)
}

#[tokio::test]
async fn test_miss_then_hit_returns_identical_data() {
    let (_store, query, cache, _clock) = setup().await;

    let first = cache
        .get_or_compute("Chennai", || query.list_shows_by_city("Chennai"))
        .await
        .unwrap();
    let second = cache
        .get_or_compute("Chennai", || query.list_shows_by_city("Chennai"))
        .await
        .unwrap();

    assert_eq!(first.status, CacheStatus::Miss);
    assert_eq!(second.status, CacheStatus::Hit);
    assert_eq!(first.shows, second.shows);
    assert_eq!(first.shows.len(), 1);
    assert_eq!(first.shows[0].title, "Coolie");
    assert_eq!(first.shows[0].theater, "Majestic");
    assert_eq!(first.shows[0].price.amount(), 200);
}

#[tokio::test]
async fn test_hit_serves_stale_data_until_cleared() {
    let (store, query, cache, _clock) = setup().await;
    let fixture_theater = store
        .list_shows_by_theater_city("Chennai", 10)
        .await
        .unwrap()
        .remove(0)
        .1;
    cache
        .get_or_compute("Chennai", || query.list_shows_by_city("Chennai"))
        .await
        .unwrap();

    add_show(&store, &fixture_theater, "Dhurandhar", 3).await.unwrap();
    let cached = cache
        .get_or_compute("Chennai", || query.list_shows_by_city("Chennai"))
        .await
        .unwrap();
    assert_eq!(cached.shows.len(), 1);

    cache.clear_all().await;
    let fresh = cache
        .get_or_compute("Chennai", || query.list_shows_by_city("Chennai"))
        .await
        .unwrap();
    assert_eq!(fresh.status, CacheStatus::Miss);
    assert_eq!(fresh.shows.len(), 2);
}

#[tokio::test]
async fn test_expired_entry_is_recomputed() {
    let (_store, query, cache, clock) = setup().await;
    cache
        .get_or_compute("Chennai", || query.list_shows_by_city("Chennai"))
        .await
        .unwrap();

    clock.advance(chrono::Duration::seconds(300));

    let again = cache
        .get_or_compute("Chennai", || query.list_shows_by_city("Chennai"))
        .await
        .unwrap();
    assert_eq!(again.status, CacheStatus::Miss);
    let stats = cache.stats().await;
    assert_eq!((stats.hits, stats.misses), (0, 2));
}

#[tokio::test]
async fn test_unknown_city_caches_empty_listing() {
    let (_store, query, cache, _clock) = setup().await;

    let first = cache
        .get_or_compute("Atlantis", || query.list_shows_by_city("Atlantis"))
        .await
        .unwrap();
    let second = cache
        .get_or_compute("Atlantis", || query.list_shows_by_city("Atlantis"))
        .await
        .unwrap();

    assert!(first.shows.is_empty());
    assert_eq!(second.status, CacheStatus::Hit);
}

proptest! {
    /// An entry is live strictly before its TTL has elapsed and dead from then on.
    #[test]
    fn entry_lives_exactly_ttl(ttl_secs in 1u64..10_000, elapsed in 0i64..20_000) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let clock = Arc::new(ManualClock::new(test_time()));
            let cache = ListingCache::new(clock.clone(), Duration::from_secs(ttl_secs));
            cache.set("Delhi", Vec::new()).await;

            clock.advance(chrono::Duration::seconds(elapsed));

            let live = cache.get("Delhi").await.is_some();
            prop_assert_eq!(live, elapsed < i64::try_from(ttl_secs).unwrap());
            Ok(())
        })?;
    }

    /// Clearing always leaves the cache empty, whatever was stored.
    #[test]
    fn clear_all_always_empties(keys in proptest::collection::vec("[A-Za-z]{1,12}", 0..20)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let clock = Arc::new(ManualClock::new(test_time()));
            let cache = ListingCache::new(clock, Duration::from_secs(300));
            for key in &keys {
                cache
                    .get_or_compute(key, || async { Ok::<_, Infallible>(Vec::new()) })
                    .await
                    .unwrap();
            }

            cache.clear_all().await;

            prop_assert_eq!(cache.stats().await.entries, 0);
            for key in &keys {
                prop_assert!(cache.get(key).await.is_none());
            }
            Ok(())
        })?;
    }
}
