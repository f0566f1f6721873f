//! Terminal failure records.
//!
//! A zip code that exhausts its retry budget (or its processing timeout) gets
//! one row here per run. It is not marked complete, so the next run retries
//! it.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::config::MAX_ERROR_MESSAGE_LENGTH;
use crate::error_handling::{DatabaseError, ErrorType};
use crate::input::ZipCode;

/// One zip code that failed terminally.
#[derive(Debug, Clone)]
pub struct FailureRecord<'a> {
    pub run_id: &'a str,
    pub collection: &'a str,
    pub zip_code: &'a ZipCode,
    pub attempts: u32,
    pub error_type: ErrorType,
    pub error_message: &'a str,
}

/// A stored failure row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSummary {
    pub zip_code: String,
    pub attempts: i64,
    pub error_type: String,
    pub error_message: String,
}

/// Inserts a failure row, truncating the message.
pub async fn record_scrape_failure(
    pool: &SqlitePool,
    failure: &FailureRecord<'_>,
) -> Result<(), DatabaseError> {
    let message = truncate_message(failure.error_message, MAX_ERROR_MESSAGE_LENGTH);

    sqlx::query(
        "INSERT INTO scrape_failures
             (run_id, collection, zip_code, attempts, error_type, error_message, failed_at_ms)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(failure.run_id)
    .bind(failure.collection)
    .bind(failure.zip_code.as_str())
    .bind(i64::from(failure.attempts))
    .bind(failure.error_type.as_str())
    .bind(message)
    .bind(Utc::now().timestamp_millis())
    .execute(pool)
    .await?;

    Ok(())
}

/// Failures recorded by `run_id`, in insertion order.
pub async fn query_run_failures(
    pool: &SqlitePool,
    run_id: &str,
) -> Result<Vec<FailureSummary>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT zip_code, attempts, error_type, error_message
         FROM scrape_failures
         WHERE run_id = ?
         ORDER BY id",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| FailureSummary {
            zip_code: row.get("zip_code"),
            attempts: row.get("attempts"),
            error_type: row.get("error_type"),
            error_message: row.get("error_message"),
        })
        .collect())
}

/// Cuts `message` to at most `max_len` bytes on a char boundary.
fn truncate_message(message: &str, max_len: usize) -> &str {
    if message.len() <= max_len {
        return message;
    }
    let mut end = max_len;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}
