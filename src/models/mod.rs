use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Market segment a listing belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Rental,
    Sold,
}

impl Dataset {
    /// Integer code used at the raw query boundary (0 = rental, 1 = sold)
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Rental),
            1 => Some(Self::Sold),
            _ => None,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rental => f.write_str("rental"),
            Self::Sold => f.write_str("sold"),
        }
    }
}

/// WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One stored listing, rental or sold
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyRecord {
    pub id: u64,
    #[serde(default)]
    pub unit: Option<String>,
    pub street_address: String,
    #[serde(default)]
    pub description: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking: u32,
    pub price: u64,
    pub property_type: i32,
    pub record_date: NaiveDate,
    pub position: GeoPoint,
}

impl PropertyRecord {
    /// Check the invariants that the unsigned field types can't carry.
    pub fn validate(&self) -> Result<(), String> {
        if !self.position.is_valid() {
            return Err(format!(
                "listing {} has invalid position ({}, {})",
                self.id, self.position.latitude, self.position.longitude
            ));
        }
        if self.street_address.trim().is_empty() {
            return Err(format!("listing {} has an empty street address", self.id));
        }
        Ok(())
    }
}
