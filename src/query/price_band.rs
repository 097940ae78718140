use serde::{Deserialize, Serialize};

/// Inclusive price interval derived from a median and a percentage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceBand {
    pub lower: f64,
    pub upper: f64,
}

impl PriceBand {
    /// `[m * (1 - p/100), m * (1 + p/100)]`
    ///
    /// Scales by the integer `100 +/- p` before the single division so a
    /// bound that is a whole number comes out exact.
    pub fn around(median: f64, percent: u32) -> Self {
        let percent = f64::from(percent);
        Self {
            lower: median * (100.0 - percent) / 100.0,
            upper: median * (100.0 + percent) / 100.0,
        }
    }

    pub fn contains(&self, price: u64) -> bool {
        let price = price as f64;
        price >= self.lower && price <= self.upper
    }
}
