use chrono::NaiveDate;
use housing_comps::query::median::interpolated_median;
use housing_comps::query::{haversine_m, Diagnostic, PriceBand};
use housing_comps::store::{InMemoryStore, ListingStore};
use housing_comps::{
    CategoryFilter, Dataset, GeoPoint, PriceRange, PropertyRecord, QueryEngine, QueryError,
    QuerySpec, RawQuery,
};
use std::sync::Arc;

const ORIGIN: GeoPoint = GeoPoint {
    latitude: -37.8136,
    longitude: 144.9631,
};

fn listing(
    id: u64,
    offset: (f64, f64),
    property_type: i32,
    beds_baths_parking: (u32, u32, u32),
    price: u64,
) -> PropertyRecord {
    let (bedrooms, bathrooms, parking) = beds_baths_parking;
    PropertyRecord {
        id,
        unit: None,
        street_address: format!("{id} Collins St"),
        description: String::new(),
        bedrooms,
        bathrooms,
        parking,
        price,
        property_type,
        record_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        position: GeoPoint::new(ORIGIN.latitude + offset.0, ORIGIN.longitude + offset.1),
    }
}

/// Five 2-bed rentals priced {300, 320, 340, 360, 1000} plus decoys.
fn scenario_store() -> InMemoryStore {
    let rental = vec![
        listing(1, (0.001, 0.0), 1, (2, 1, 0), 300),
        listing(2, (0.004, 0.0), 1, (2, 1, 0), 320),
        listing(3, (0.002, 0.0), 1, (2, 1, 0), 340),
        listing(4, (0.003, 0.0), 1, (2, 1, 0), 360),
        listing(5, (0.005, 0.0), 1, (2, 1, 0), 1000),
        // same prices, different categories, all closer than the matches
        listing(20, (0.0001, 0.0), 2, (2, 1, 0), 330),
        listing(21, (0.0002, 0.0), 1, (3, 1, 0), 330),
        listing(22, (0.0003, 0.0), 1, (2, 2, 0), 330),
        listing(23, (0.0004, 0.0), 1, (2, 1, 1), 330),
    ];
    let sold = vec![
        listing(100, (0.001, 0.001), 1, (2, 1, 0), 650_000),
        listing(101, (0.002, 0.002), 1, (2, 1, 0), 700_000),
    ];
    InMemoryStore::new(rental, sold).unwrap()
}

fn raw(k: i64, dataset: i32, range_percentage: i32) -> RawQuery {
    RawQuery {
        lon: ORIGIN.longitude,
        lat: ORIGIN.latitude,
        k,
        dataset,
        property_type: 1,
        bedrooms: 2,
        bathrooms: 1,
        parking: 0,
        range_percentage,
    }
}

fn ids(outcome: &housing_comps::QueryOutcome) -> Vec<u64> {
    outcome.records().map(|r| r.id).collect()
}

#[tokio::test]
async fn scenario_a_price_band_around_median() {
    let engine = QueryEngine::new(scenario_store());
    let outcome = engine.find_k_nearest_raw(raw(10, 0, 10)).await.unwrap();

    // median 340, band [306, 374]
    let mut prices = outcome.prices();
    prices.sort_unstable();
    assert_eq!(prices, vec![320, 340, 360]);
    // ranked by distance: 3 (0.002), 4 (0.003), 2 (0.004)
    assert_eq!(ids(&outcome), vec![3, 4, 2]);
    assert_eq!(outcome.diagnostic, None);
}

#[tokio::test]
async fn scenario_b_no_matching_population() {
    let engine = QueryEngine::new(scenario_store());
    let query = RawQuery {
        bedrooms: 5,
        ..raw(10, 0, 10)
    };
    let outcome = engine.find_k_nearest_raw(query).await.unwrap();
    assert!(outcome.is_empty());
    assert_eq!(outcome.diagnostic, Some(Diagnostic::NoMatchingPopulation));
}

#[tokio::test]
async fn scenario_c_k_zero_is_checked_before_dataset() {
    let engine = QueryEngine::new(scenario_store());

    let outcome = engine.find_k_nearest_raw(raw(0, 0, -1)).await.unwrap();
    assert!(outcome.is_empty());
    assert_eq!(outcome.diagnostic, Some(Diagnostic::InvalidK));

    // an invalid dataset code does not matter once k is rejected
    let outcome = engine.find_k_nearest_raw(raw(-3, 7, -9)).await.unwrap();
    assert_eq!(outcome.diagnostic, Some(Diagnostic::InvalidK));
}

#[tokio::test]
async fn scenario_d_invalid_dataset() {
    let engine = QueryEngine::new(scenario_store());
    let err = engine.find_k_nearest_raw(raw(5, 2, -1)).await.unwrap_err();
    assert!(matches!(err, QueryError::InvalidDataset(2)));
    assert_eq!(err.to_string(), "invalid dataset: 2");
}

#[tokio::test]
async fn invalid_range_percentage() {
    let engine = QueryEngine::new(scenario_store());
    let err = engine.find_k_nearest_raw(raw(5, 0, -2)).await.unwrap_err();
    assert!(matches!(err, QueryError::InvalidRangePercentage(-2)));
}

#[tokio::test]
async fn sentinel_never_filters_on_price() {
    let engine = QueryEngine::new(scenario_store());
    let outcome = engine.find_k_nearest_raw(raw(10, 0, -1)).await.unwrap();
    assert_eq!(ids(&outcome), vec![1, 3, 4, 2, 5]);
    assert!(outcome.prices().contains(&1000));
}

#[tokio::test]
async fn categorical_filters_actually_exclude() {
    // the four decoys are nearer than every match; none may leak through
    let engine = QueryEngine::new(scenario_store());
    let outcome = engine.find_k_nearest_raw(raw(4, 0, -1)).await.unwrap();
    assert_eq!(ids(&outcome), vec![1, 3, 4, 2]);
    assert!(outcome
        .records()
        .all(|r| r.property_type == 1 && r.bedrooms == 2 && r.bathrooms == 1 && r.parking == 0));
}

#[tokio::test]
async fn k_one_returns_single_closest() {
    let engine = QueryEngine::new(scenario_store());
    let outcome = engine.find_k_nearest_raw(raw(1, 0, -1)).await.unwrap();
    assert_eq!(ids(&outcome), vec![1]);
}

#[tokio::test]
async fn results_are_capped_ordered_and_repeatable() {
    let engine = QueryEngine::new(scenario_store());
    let spec = QuerySpec::new(ORIGIN, 3, Dataset::Rental, CategoryFilter::new(1, 2, 1, 0));

    let first = engine.find_k_nearest(&spec).await.unwrap();
    let second = engine.find_k_nearest(&spec).await.unwrap();
    assert_eq!(first, second);
    assert!(first.len() <= 3);
    assert!(first
        .neighbors
        .windows(2)
        .all(|w| w[0].distance_m <= w[1].distance_m));
    for neighbor in &first.neighbors {
        let expected = haversine_m(ORIGIN, neighbor.record.position);
        assert!((neighbor.distance_m - expected).abs() < 1e-9);
    }
}

#[tokio::test]
async fn band_results_lie_inside_band_for_any_percentage() {
    let engine = QueryEngine::new(scenario_store());
    let filter = CategoryFilter::new(1, 2, 1, 0);
    let snapshot = engine.store().snapshot(Dataset::Rental).await.unwrap();
    let median = interpolated_median(
        snapshot
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.price),
    )
    .unwrap();
    assert_eq!(median, 340.0);
    for percent in [0u32, 5, 10, 50, 200] {
        let spec = QuerySpec::new(ORIGIN, 10, Dataset::Rental, CategoryFilter::new(1, 2, 1, 0))
            .with_price_range(PriceRange::WithinPercent(percent));
        let outcome = engine.find_k_nearest(&spec).await.unwrap();
        let band = PriceBand::around(median, percent);
        assert!(outcome.records().all(|r| band.contains(r.price)), "p={percent}");
        assert!(outcome.prices().contains(&340), "p={percent}");
    }
}

#[tokio::test]
async fn sold_dataset_is_queried_exclusively() {
    let engine = QueryEngine::new(scenario_store());
    let outcome = engine.find_k_nearest_raw(raw(10, 1, -1)).await.unwrap();
    assert_eq!(ids(&outcome), vec![100, 101]);
}

#[tokio::test]
async fn concurrent_queries_agree() {
    let engine = Arc::new(QueryEngine::new(scenario_store()));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.find_k_nearest_raw(raw(3, 0, 10)).await.unwrap()
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }
    assert!(outcomes.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(ids(&outcomes[0]), vec![3, 4, 2]);
}

#[tokio::test]
async fn refreshed_snapshot_is_seen_by_later_queries() {
    let engine = QueryEngine::new(scenario_store());
    engine
        .store()
        .replace(
            Dataset::Rental,
            vec![listing(50, (0.01, 0.0), 1, (2, 1, 0), 400)],
        )
        .await
        .unwrap();

    let snapshot = engine.store().snapshot(Dataset::Rental).await.unwrap();
    assert_eq!(snapshot.len(), 1);
    let outcome = engine.find_k_nearest_raw(raw(5, 0, 0)).await.unwrap();
    assert_eq!(ids(&outcome), vec![50]);
}
