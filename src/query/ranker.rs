//! Distance ranking of candidate listings.
//!
//! Distances are great-circle metres from the haversine formula on a
//! spherical Earth. Every candidate in one query uses the same metric, and
//! equal distances fall back to ascending listing id so output is stable.

use crate::models::{GeoPoint, PropertyRecord};
use crate::query::types::Neighbor;
use std::cmp::Ordering;

/// IUGG mean Earth radius
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two points in metres.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

fn by_distance_then_id(a: &(f64, &PropertyRecord), b: &(f64, &PropertyRecord)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id))
}

/// Rank `candidates` by distance from `origin` and keep the closest `k`.
pub fn rank_nearest<'a, I>(origin: GeoPoint, candidates: I, k: usize) -> Vec<Neighbor>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &PropertyRecord)> = candidates
        .into_iter()
        .map(|record| (haversine_m(origin, record.position), record))
        .collect();

    // Partition the closest k to the front before sorting them
    if scored.len() > k {
        scored.select_nth_unstable_by(k - 1, by_distance_then_id);
        scored.truncate(k);
    }
    scored.sort_unstable_by(by_distance_then_id);

    scored
        .into_iter()
        .map(|(distance_m, record)| Neighbor {
            record: record.clone(),
            distance_m,
        })
        .collect()
}
