pub mod config;
pub mod error;
pub mod geocode;
pub mod models;
pub mod query;
pub mod store;
pub mod valuation;

pub use error::{QueryError, Result};
pub use models::{Dataset, GeoPoint, PropertyRecord};
pub use query::{CategoryFilter, PriceRange, QueryEngine, QueryOutcome, QuerySpec, RawQuery};
