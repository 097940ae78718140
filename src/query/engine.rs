use crate::error::{QueryError, Result};
use crate::geocode::Geocoder;
use crate::models::PropertyRecord;
use crate::query::median::median_price;
use crate::query::price_band::PriceBand;
use crate::query::ranker::rank_nearest;
use crate::query::types::{Diagnostic, PriceRange, QueryOutcome, QuerySpec, RawQuery};
use crate::store::ListingStore;
use tracing::{debug, info, warn};

/// k-nearest listing search over a [`ListingStore`]
pub struct QueryEngine<S> {
    store: S,
}

impl<S: ListingStore> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Find the `k` closest listings matching `spec`.
    ///
    /// `k == 0` and an empty categorical population under a price band are
    /// reported as empty outcomes with a [`Diagnostic`], not as errors.
    pub async fn find_k_nearest(&self, spec: &QuerySpec) -> Result<QueryOutcome> {
        if spec.k == 0 {
            warn!("Rejecting query: invalid k");
            return Ok(QueryOutcome::empty(Diagnostic::InvalidK));
        }
        if !spec.point.is_valid() {
            return Err(QueryError::InvalidCoordinates {
                latitude: spec.point.latitude,
                longitude: spec.point.longitude,
            });
        }

        let snapshot = self.store.snapshot(spec.dataset).await?;
        debug!(
            "Querying {} {} listings from {} store",
            snapshot.len(),
            spec.dataset,
            self.store.store_name()
        );

        let band = match spec.price_range {
            PriceRange::Unbounded => None,
            PriceRange::WithinPercent(percent) => {
                let Some(median) = median_price(&snapshot, &spec.filter) else {
                    info!("No {} listings match {:?}", spec.dataset, spec.filter);
                    return Ok(QueryOutcome::empty(Diagnostic::NoMatchingPopulation));
                };
                let band = PriceBand::around(median, percent);
                debug!(
                    median,
                    lower = band.lower,
                    upper = band.upper,
                    "Price band derived"
                );
                Some(band)
            }
        };

        let filter = spec.filter;
        let survivors = snapshot.iter().filter(|record: &&PropertyRecord| {
            filter.matches(record) && band.map_or(true, |b| b.contains(record.price))
        });
        let neighbors = rank_nearest(spec.point, survivors, spec.k);

        info!(
            "Found {} of k={} nearest {} listings",
            neighbors.len(),
            spec.k,
            spec.dataset
        );
        Ok(QueryOutcome::ranked(neighbors))
    }

    /// Raw-argument form of [`Self::find_k_nearest`].
    ///
    /// `k` is checked first, then the dataset code, then the range
    /// percentage (`-1` disables price filtering).
    pub async fn find_k_nearest_raw(&self, raw: RawQuery) -> Result<QueryOutcome> {
        if raw.k <= 0 {
            warn!("Rejecting query: invalid k ({})", raw.k);
            return Ok(QueryOutcome::empty(Diagnostic::InvalidK));
        }
        let spec = raw.into_spec()?;
        self.find_k_nearest(&spec).await
    }

    /// Geocode `address` in `area`, then query around it with `spec`'s
    /// criteria.
    pub async fn find_k_nearest_to_address<G>(
        &self,
        geocoder: &G,
        address: &str,
        area: &str,
        spec: QuerySpec,
    ) -> Result<QueryOutcome>
    where
        G: Geocoder + ?Sized,
    {
        if spec.k == 0 {
            warn!("Rejecting query: invalid k");
            return Ok(QueryOutcome::empty(Diagnostic::InvalidK));
        }
        let point = geocoder
            .locate(address, area)
            .await?
            .ok_or_else(|| QueryError::AddressNotFound(format!("{address}, {area}")))?;
        debug!(
            "Geocoded {} to ({}, {}) via {}",
            address,
            point.latitude,
            point.longitude,
            geocoder.geocoder_name()
        );
        self.find_k_nearest(&spec.at(point)).await
    }
}
