// Shared test helpers for store setup, input files and a mocked quote site.
//
// Included by the integration tests through `#[path = "helpers.rs"] mod helpers;`.

#![allow(dead_code)] // Each test file uses a different subset

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use httptest::Server;
use sqlx::SqlitePool;

use storage_prices::storage::open_store;
use storage_prices::{Config, PriceRecord, ZipCode};

pub const AJAX_PATH: &str = "/san-antonio-tx/wp-admin/admin-ajax.php";
pub const CALCULATOR_PATH: &str = "/san-antonio-tx/storage-calculator/";

/// A successful quote response for `total`.
pub fn quote_body(total: &str) -> String {
    format!(
        r#"{{"success":true,"data":{{"facility_name":"UNITS San Antonio","email":"jo@example.com","rooms":"3","pricing":{{"total":"{total}","units":[{{"size":"12ft","price":129}},{{"size":"16ft","price":"$159.00"}}]}}}}}}"#
    )
}

/// Writes a single-column CSV with a header row.
pub fn write_zip_csv(dir: &Path, zips: &[&str]) -> PathBuf {
    let path = dir.join("zips.csv");
    let mut content = String::from("zip_code\n");
    for zip in zips {
        content.push_str(zip);
        content.push('\n');
    }
    std::fs::write(&path, content).expect("Failed to write input CSV");
    path
}

/// Scrape configuration pointed at `server`, with no politeness delay and
/// millisecond retry delays.
pub fn test_config(dir: &Path, server: &Server, zips: &[&str]) -> Config {
    Config {
        file: write_zip_csv(dir, zips),
        db_path: dir.join("prices.db"),
        endpoint: server.url_str(AJAX_PATH),
        referer: server.url_str(CALCULATOR_PATH),
        max_attempts: 3,
        retry_base_delay_ms: 1,
        retry_max_delay_ms: 1,
        min_delay_ms: 0,
        max_delay_ms: 0,
        timeout_seconds: 5,
        ..Default::default()
    }
}

/// Opens (and migrates) the store at `db_path`.
pub async fn open_test_store(db_path: &Path) -> SqlitePool {
    open_store(db_path)
        .await
        .expect("Failed to open test store")
}

pub fn zip(value: &str) -> ZipCode {
    ZipCode::parse(value).expect("valid test zip")
}

/// A stored price record with fixed values.
pub fn sample_record(zip_code: &str, total: f64) -> PriceRecord {
    PriceRecord {
        zip_code: zip(zip_code),
        facility_name: Some("UNITS Test Facility".to_string()),
        unit_sizes: vec!["12ft".to_string(), "16ft".to_string()],
        prices: vec![total - 30.0, total],
        total_price: total,
        details: serde_json::json!({
            "date": "09/29/2025",
            "ldate": "2025-09-26",
            "email": "test@example.com",
            "rooms": "3",
            "ID": 42
        }),
        scraped_at: Utc.with_ymd_and_hms(2025, 9, 26, 12, 0, 0).unwrap(),
    }
}
