use crate::models::PropertyRecord;
use crate::query::types::CategoryFilter;

/// Interpolated median (continuous 0.5 quantile) of `values`.
///
/// Sorts a private copy; returns `None` for an empty input.
pub fn interpolated_median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = u64>,
{
    let mut sorted: Vec<u64> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable();

    // Position 0.5 * (n - 1) between order statistics
    let n = sorted.len();
    let lower = (n - 1) / 2;
    let lo = sorted[lower] as f64;
    if n % 2 == 1 {
        return Some(lo);
    }
    let hi = sorted[lower + 1] as f64;
    Some(lo + (hi - lo) * 0.5)
}

/// Median price of the listings in `records` matching `filter`, or `None`
/// when nothing matches.
pub fn median_price(records: &[PropertyRecord], filter: &CategoryFilter) -> Option<f64> {
    interpolated_median(
        records
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| record.price),
    )
}
