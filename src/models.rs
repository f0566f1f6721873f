use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::ZipCode;

/// Prices quoted for one zip code.
///
/// Stored as one JSON document per zip code; `unit_sizes[i]` pairs with
/// `prices[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub zip_code: ZipCode,
    pub facility_name: Option<String>,
    pub unit_sizes: Vec<String>,
    pub prices: Vec<f64>,
    pub total_price: f64,
    /// The `data` object of the quote response, kept verbatim.
    pub details: serde_json::Value,
    pub scraped_at: DateTime<Utc>,
}

impl PriceRecord {
    /// Iterates `(size, price)` pairs.
    pub fn units(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.unit_sizes
            .iter()
            .map(String::as_str)
            .zip(self.prices.iter().copied())
    }
}
