//! Property valuation from nearby comparables.
//!
//! Two approaches sit on top of the nearest-listing query:
//! - income: capitalise the median rent of nearby rentals;
//! - comparison: take the median sale price of nearby sold listings.
//!
//! Both look for comparables with the same type, bedrooms, bathrooms and
//! parking, without a price band.

use crate::config::ValuationConfig;
use crate::error::Result;
use crate::geocode::Geocoder;
use crate::models::{Dataset, GeoPoint};
use crate::query::median::interpolated_median;
use crate::query::{CategoryFilter, PriceRange, QueryEngine, QuerySpec};
use crate::store::ListingStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The property being valued
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub address: String,
    pub area: String,
    pub filter: CategoryFilter,
}

/// Estimate plus the comparables it was derived from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Valuation {
    pub estimate: f64,
    pub comparables: usize,
    pub median_price: f64,
}

pub struct PropertyValuator<'a, S, G: ?Sized> {
    engine: &'a QueryEngine<S>,
    geocoder: &'a G,
    config: ValuationConfig,
}

impl<'a, S, G> PropertyValuator<'a, S, G>
where
    S: ListingStore,
    G: Geocoder + ?Sized,
{
    pub fn new(engine: &'a QueryEngine<S>, geocoder: &'a G, config: ValuationConfig) -> Self {
        Self {
            engine,
            geocoder,
            config,
        }
    }

    /// Income approach: `median rent * 12 / cap rate`.
    ///
    /// `None` when fewer than the configured minimum of rentals are found.
    pub async fn income_based(&self, subject: &Subject) -> Result<Option<Valuation>> {
        let Some((median, comparables)) = self
            .median_of_comparables(
                subject,
                Dataset::Rental,
                self.config.rental_comparables,
                self.config.min_rental_comparables,
            )
            .await?
        else {
            return Ok(None);
        };

        let estimate = median * 12.0 / self.config.cap_rate;
        info!(
            "Income valuation for {}: {:.0} from {} rentals",
            subject.address, estimate, comparables
        );
        Ok(Some(Valuation {
            estimate,
            comparables,
            median_price: median,
        }))
    }

    /// Sales comparison approach: median of nearby sold prices.
    pub async fn comparison_based(&self, subject: &Subject) -> Result<Option<Valuation>> {
        let Some((median, comparables)) = self
            .median_of_comparables(
                subject,
                Dataset::Sold,
                self.config.sold_comparables,
                self.config.min_sold_comparables,
            )
            .await?
        else {
            return Ok(None);
        };

        info!(
            "Comparison valuation for {}: {:.0} from {} sales",
            subject.address, median, comparables
        );
        Ok(Some(Valuation {
            estimate: median,
            comparables,
            median_price: median,
        }))
    }

    async fn median_of_comparables(
        &self,
        subject: &Subject,
        dataset: Dataset,
        k: usize,
        min_required: usize,
    ) -> Result<Option<(f64, usize)>> {
        // point is replaced by the geocoded address
        let spec = QuerySpec::new(GeoPoint::new(0.0, 0.0), k, dataset, subject.filter)
            .with_price_range(PriceRange::Unbounded);
        let outcome = self
            .engine
            .find_k_nearest_to_address(self.geocoder, &subject.address, &subject.area, spec)
            .await?;

        if outcome.len() < min_required {
            warn!(
                "Insufficient {} data for valuation: {} of {} comparables",
                dataset,
                outcome.len(),
                min_required
            );
            return Ok(None);
        }

        Ok(interpolated_median(outcome.prices()).map(|median| (median, outcome.len())))
    }
}
