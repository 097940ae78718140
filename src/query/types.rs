use crate::error::QueryError;
use crate::models::{Dataset, GeoPoint, PropertyRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact-match categorical filter.
///
/// Field names differ from the `PropertyRecord` columns on purpose so a
/// predicate always reads `record.bedrooms == filter.wanted_bedrooms` and
/// can never compare a column with itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryFilter {
    pub wanted_property_type: i32,
    pub wanted_bedrooms: u32,
    pub wanted_bathrooms: u32,
    pub wanted_parking: u32,
}

impl CategoryFilter {
    pub fn new(property_type: i32, bedrooms: u32, bathrooms: u32, parking: u32) -> Self {
        Self {
            wanted_property_type: property_type,
            wanted_bedrooms: bedrooms,
            wanted_bathrooms: bathrooms,
            wanted_parking: parking,
        }
    }

    pub fn matches(&self, record: &PropertyRecord) -> bool {
        record.property_type == self.wanted_property_type
            && record.bedrooms == self.wanted_bedrooms
            && record.bathrooms == self.wanted_bathrooms
            && record.parking == self.wanted_parking
    }
}

/// Optional price band around the filtered median
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PriceRange {
    /// No price filtering
    #[default]
    Unbounded,
    /// Keep listings within +/- this percentage of the median
    WithinPercent(u32),
}

impl PriceRange {
    /// Raw sentinel reserved for "no price filtering"
    pub const NO_FILTER: i32 = -1;

    /// Decode the raw `rangePercentage` argument.
    pub fn from_sentinel(raw: i32) -> Result<Self, QueryError> {
        match raw {
            Self::NO_FILTER => Ok(Self::Unbounded),
            p if p >= 0 => Ok(Self::WithinPercent(p as u32)),
            p => Err(QueryError::InvalidRangePercentage(p)),
        }
    }
}

/// Typed query input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuerySpec {
    pub point: GeoPoint,
    pub k: usize,
    pub dataset: Dataset,
    pub filter: CategoryFilter,
    #[serde(default)]
    pub price_range: PriceRange,
}

impl QuerySpec {
    pub fn new(point: GeoPoint, k: usize, dataset: Dataset, filter: CategoryFilter) -> Self {
        Self {
            point,
            k,
            dataset,
            filter,
            price_range: PriceRange::Unbounded,
        }
    }

    pub fn with_price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = price_range;
        self
    }

    /// Same criteria, different query point.
    pub fn at(mut self, point: GeoPoint) -> Self {
        self.point = point;
        self
    }
}

/// Untyped query in the shape of the external call contract:
/// `(lon, lat, k, dataset, propertyType, bedrooms, bathrooms, parking, rangePercentage)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RawQuery {
    pub lon: f64,
    pub lat: f64,
    pub k: i64,
    pub dataset: i32,
    pub property_type: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub parking: i32,
    pub range_percentage: i32,
}

impl RawQuery {
    /// Decode into a [`QuerySpec`], checking dataset, then range, then the
    /// rest. `k` must already be known positive.
    pub(crate) fn into_spec(self) -> Result<QuerySpec, QueryError> {
        let dataset = Dataset::from_code(self.dataset)
            .ok_or(QueryError::InvalidDataset(self.dataset))?;
        let price_range = PriceRange::from_sentinel(self.range_percentage)?;

        let count = |name: &str, value: i32| {
            u32::try_from(value)
                .map_err(|_| QueryError::InvalidFilter(format!("{name} must be >= 0, got {value}")))
        };
        let filter = CategoryFilter::new(
            self.property_type,
            count("bedrooms", self.bedrooms)?,
            count("bathrooms", self.bathrooms)?,
            count("parking", self.parking)?,
        );

        let k = usize::try_from(self.k).unwrap_or(usize::MAX);
        Ok(QuerySpec::new(GeoPoint::new(self.lat, self.lon), k, dataset, filter)
            .with_price_range(price_range))
    }
}

/// Why a successful query came back empty
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Diagnostic {
    InvalidK,
    NoMatchingPopulation,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidK => f.write_str("invalid k"),
            Self::NoMatchingPopulation => f.write_str("no matching population"),
        }
    }
}

/// A ranked listing with its distance from the query point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Neighbor {
    pub record: PropertyRecord,
    pub distance_m: f64,
}

/// Result of a successful query: ranked listings, possibly empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryOutcome {
    pub neighbors: Vec<Neighbor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl QueryOutcome {
    pub fn ranked(neighbors: Vec<Neighbor>) -> Self {
        Self {
            neighbors,
            diagnostic: None,
        }
    }

    pub fn empty(diagnostic: Diagnostic) -> Self {
        Self {
            neighbors: Vec::new(),
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.neighbors.iter().map(|n| &n.record)
    }

    pub fn prices(&self) -> Vec<u64> {
        self.records().map(|r| r.price).collect()
    }
}
