//! CSV export functionality.
//!
//! One row per zip code. Units are flattened into two `; `-joined columns and
//! the echoed form fields of the quote response become their own columns.

use std::io::Write;

use anyhow::Result;
use csv::Writer;
use futures::TryStreamExt;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::models::PriceRecord;
use crate::storage::stream_price_records;

/// Fields of the quote response `data` object exported as columns.
pub(crate) const DETAIL_FIELDS: &[&str] = &[
    "date", "ldate", "email", "name", "phone", "rooms", "promocode", "sixteens", "twelves",
    "clientIP", "months", "CityFrom", "StateFrom", "ID",
];

const BASE_COLUMNS: &[&str] = &[
    "zip_code",
    "facility_name",
    "unit_sizes",
    "prices",
    "total_price",
    "scraped_at",
];

/// Writes every document of `collection` as CSV to `out`.
///
/// Returns the number of rows written (header excluded).
pub async fn write_csv<W: Write>(pool: &SqlitePool, collection: &str, out: W) -> Result<usize> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(BASE_COLUMNS.iter().chain(DETAIL_FIELDS.iter()))?;

    let mut records = stream_price_records(pool, collection);
    let mut record_count = 0;
    while let Some(record) = records.try_next().await? {
        writer.write_record(csv_row(&record))?;
        record_count += 1;
    }

    writer.flush()?;
    Ok(record_count)
}

fn csv_row(record: &PriceRecord) -> Vec<String> {
    let prices: Vec<String> = record.prices.iter().map(|p| format_price(*p)).collect();

    let mut row = vec![
        record.zip_code.to_string(),
        record.facility_name.clone().unwrap_or_default(),
        record.unit_sizes.join("; "),
        prices.join("; "),
        format_price(record.total_price),
        record.scraped_at.to_rfc3339(),
    ];
    row.extend(
        DETAIL_FIELDS
            .iter()
            .map(|field| detail_value(&record.details, field)),
    );
    row
}

fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Scalar detail fields as text; missing, null and nested values are empty.
fn detail_value(details: &Value, field: &str) -> String {
    match details.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
