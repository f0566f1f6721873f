//! Shared test helpers for storage module tests.

#[cfg(test)]
use chrono::{TimeZone, Utc};
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::input::ZipCode;
#[cfg(test)]
use crate::models::PriceRecord;
#[cfg(test)]
use crate::storage::{init_memory_pool, run_migrations};

/// Creates a migrated in-memory database pool.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = init_memory_pool()
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A price record with one unit and fixed timestamp.
#[cfg(test)]
pub fn sample_record(zip: &str, total: f64) -> PriceRecord {
    PriceRecord {
        zip_code: ZipCode::parse(zip).expect("valid test zip"),
        facility_name: Some("UNITS Test Facility".to_string()),
        unit_sizes: vec!["12ft".to_string()],
        prices: vec![total],
        total_price: total,
        details: serde_json::json!({"email": "test@example.com", "rooms": "3"}),
        scraped_at: Utc.with_ymd_and_hms(2025, 9, 26, 12, 0, 0).unwrap(),
    }
}
