//! Quote response parsing.
//!
//! Turns the JSON body of a quote response into a [`PriceRecord`]:
//! - throttling marker and `success` flag checks
//! - total price extraction (number or numeric string)
//! - facility name and per-unit prices, when the site reports them

mod fields;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::LIMIT_REACHED_MARKER;
use crate::error_handling::ParseError;
use crate::input::ZipCode;
use crate::models::PriceRecord;

pub use fields::{extract_facility_name, extract_total_price, extract_units};

/// Parses a quote response body.
///
/// Fails when the body carries the limit marker, is not JSON, does not report
/// success, or lacks `data.pricing.total`.
pub fn parse_price_response(
    zip_code: &ZipCode,
    body: &str,
    scraped_at: DateTime<Utc>,
) -> Result<PriceRecord, ParseError> {
    if body.contains(LIMIT_REACHED_MARKER) {
        return Err(ParseError::LimitReached);
    }

    let json: Value = serde_json::from_str(body)?;
    if json.get("success") != Some(&Value::Bool(true)) {
        return Err(ParseError::Unsuccessful);
    }

    let data = json.get("data").cloned().unwrap_or(Value::Null);
    let total_price =
        extract_total_price(&data).ok_or(ParseError::MissingField("data.pricing.total"))?;
    let (unit_sizes, prices): (Vec<String>, Vec<f64>) = extract_units(&data).into_iter().unzip();

    Ok(PriceRecord {
        zip_code: zip_code.clone(),
        facility_name: extract_facility_name(&data),
        unit_sizes,
        prices,
        total_price,
        details: data,
        scraped_at,
    })
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
