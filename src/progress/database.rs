//! Progress kept in the `scrape_progress` table.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error_handling::ProgressError;
use crate::input::ZipCode;

pub(super) async fn load_completed(
    pool: &SqlitePool,
    collection: &str,
) -> Result<HashSet<ZipCode>, ProgressError> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT zip_code FROM scrape_progress WHERE collection = ?")
            .bind(collection)
            .fetch_all(pool)
            .await?;

    Ok(rows
        .iter()
        .filter_map(|raw| match ZipCode::parse(raw) {
            Ok(zip) => Some(zip),
            Err(e) => {
                log::warn!("Ignoring stored progress entry: {e}");
                None
            }
        })
        .collect())
}

/// Insert-or-ignore, so marking twice keeps the first completion time.
pub(super) async fn mark(
    pool: &SqlitePool,
    collection: &str,
    zip_code: &ZipCode,
    run_id: Option<&str>,
) -> Result<(), ProgressError> {
    sqlx::query(
        "INSERT OR IGNORE INTO scrape_progress (collection, zip_code, completed_at_ms, run_id)
         VALUES (?, ?, ?, ?)",
    )
    .bind(collection)
    .bind(zip_code.as_str())
    .bind(Utc::now().timestamp_millis())
    .bind(run_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(super) async fn clear(pool: &SqlitePool, collection: &str) -> Result<u64, ProgressError> {
    let result = sqlx::query("DELETE FROM scrape_progress WHERE collection = ?")
        .bind(collection)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
