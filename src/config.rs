use std::path::PathBuf;

pub const DATA_PATH_ENV: &str = "HOUSING_COMPS_DATA";
pub const GEOCODER_URL_ENV: &str = "HOUSING_COMPS_GEOCODER_URL";
pub const GEOCODER_REGION_ENV: &str = "HOUSING_COMPS_GEOCODER_REGION";
pub const GEOCODER_TIMEOUT_SECS_ENV: &str = "HOUSING_COMPS_GEOCODER_TIMEOUT_SECS";
pub const USER_AGENT_ENV: &str = "HOUSING_COMPS_USER_AGENT";
pub const CAP_RATE_ENV: &str = "HOUSING_COMPS_CAP_RATE";

const DEFAULT_DATA_PATH: &str = "listings.json";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_REGION: &str = "Victoria, Australia";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "property_locator";
const DEFAULT_CAP_RATE: f64 = 0.05;

/// Runtime settings, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub geocoder: GeocoderConfig,
    pub valuation: ValuationConfig,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub endpoint: String,
    /// Appended to every address before lookup
    pub region: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_URL.to_string(),
            region: Some(DEFAULT_REGION.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Parameters of the income and comparison valuation approaches
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationConfig {
    /// Annual rent divided by value
    pub cap_rate: f64,
    pub rental_comparables: usize,
    pub min_rental_comparables: usize,
    pub sold_comparables: usize,
    pub min_sold_comparables: usize,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            cap_rate: DEFAULT_CAP_RATE,
            rental_comparables: 10,
            min_rental_comparables: 3,
            sold_comparables: 20,
            min_sold_comparables: 5,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            geocoder: GeocoderConfig::default(),
            valuation: ValuationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unset, blank or unparsable
    /// values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let region = match lookup(GEOCODER_REGION_ENV) {
            // explicitly empty disables the suffix
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().to_string()),
            None => defaults.geocoder.region,
        };

        Self {
            data_path: read(DATA_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            geocoder: GeocoderConfig {
                endpoint: read(GEOCODER_URL_ENV).unwrap_or(defaults.geocoder.endpoint),
                region,
                timeout_secs: read(GEOCODER_TIMEOUT_SECS_ENV)
                    .and_then(|raw| raw.parse::<u64>().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(defaults.geocoder.timeout_secs),
                user_agent: read(USER_AGENT_ENV).unwrap_or(defaults.geocoder.user_agent),
            },
            valuation: ValuationConfig {
                cap_rate: read(CAP_RATE_ENV)
                    .and_then(|raw| raw.parse::<f64>().ok())
                    .filter(|rate| rate.is_finite() && *rate > 0.0)
                    .unwrap_or(defaults.valuation.cap_rate),
                ..defaults.valuation
            },
        }
    }
}
