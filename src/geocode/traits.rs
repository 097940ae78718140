use crate::models::GeoPoint;
use anyhow::Result;
use async_trait::async_trait;

/// Resolves a street address to a query point
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service has no match for the address
    async fn locate(&self, address: &str, area: &str) -> Result<Option<GeoPoint>>;

    /// Get the name of the geocoding service
    fn geocoder_name(&self) -> &'static str;
}
