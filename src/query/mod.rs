pub mod engine;
pub mod median;
pub mod price_band;
pub mod ranker;
pub mod types;

pub use engine::QueryEngine;
pub use price_band::PriceBand;
pub use ranker::{haversine_m, EARTH_RADIUS_M};
pub use types::{
    CategoryFilter, Diagnostic, Neighbor, PriceRange, QueryOutcome, QuerySpec, RawQuery,
};
