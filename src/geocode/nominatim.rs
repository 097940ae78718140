use crate::config::GeocoderConfig;
use crate::geocode::traits::Geocoder;
use crate::models::GeoPoint;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// One hit from the Nominatim `/search?format=json` endpoint.
/// Coordinates come back as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Geocoder backed by an OpenStreetMap Nominatim instance
pub struct NominatimGeocoder {
    client: Client,
    config: GeocoderConfig,
}

impl NominatimGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Full free-form query, e.g. "12 Smith St, Fitzroy, Victoria, Australia"
    fn search_text(&self, address: &str, area: &str) -> String {
        match self.config.region.as_deref() {
            Some(region) if !region.is_empty() => format!("{address}, {area}, {region}"),
            _ => format!("{address}, {area}"),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn locate(&self, address: &str, area: &str) -> Result<Option<GeoPoint>> {
        let query = self.search_text(address, area);
        debug!("Geocoding '{}'", query);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .context("Failed to reach geocoder")?;

        if !response.status().is_success() {
            warn!("Geocoder returned status: {}", response.status());
            anyhow::bail!("Geocoder request failed: {}", response.status());
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .context("Failed to decode geocoder response")?;

        parse_first_hit(&hits)
    }

    fn geocoder_name(&self) -> &'static str {
        "Nominatim"
    }
}

fn parse_first_hit(hits: &[SearchHit]) -> Result<Option<GeoPoint>> {
    let Some(hit) = hits.first() else {
        return Ok(None);
    };
    let latitude: f64 = hit
        .lat
        .trim()
        .parse()
        .with_context(|| format!("Bad latitude in geocoder response: {}", hit.lat))?;
    let longitude: f64 = hit
        .lon
        .trim()
        .parse()
        .with_context(|| format!("Bad longitude in geocoder response: {}", hit.lon))?;

    let point = GeoPoint::new(latitude, longitude);
    if !point.is_valid() {
        anyhow::bail!("Geocoder returned out-of-range point ({latitude}, {longitude})");
    }
    Ok(Some(point))
}
