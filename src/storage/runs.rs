//! Run metadata.
//!
//! One row per scrape run: inserted at start, completed with the final
//! counters when the run ends.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;

/// Metadata for a scrape run, recorded at start.
pub struct RunMetadata<'a> {
    pub run_id: &'a str,
    pub collection: &'a str,
    pub start_time_ms: i64,
    pub version: &'a str,
}

/// Counters for a finished run, recorded at end.
pub struct RunStats<'a> {
    pub run_id: &'a str,
    pub total_inputs: i64,
    pub skipped: i64,
    pub attempted: i64,
    pub succeeded: i64,
    pub failed: i64,
    pub interrupted: bool,
    pub elapsed_seconds: f64,
}

/// Inserts or updates run metadata in the runs table.
pub async fn insert_run_metadata(
    pool: &SqlitePool,
    meta: &RunMetadata<'_>,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO runs (run_id, collection, version, start_time_ms)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(run_id) DO UPDATE SET
             collection=excluded.collection,
             version=excluded.version,
             start_time_ms=excluded.start_time_ms",
    )
    .bind(meta.run_id)
    .bind(meta.collection)
    .bind(meta.version)
    .bind(meta.start_time_ms)
    .execute(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(())
}

/// Records the final counters of a run.
pub async fn update_run_stats(pool: &SqlitePool, stats: &RunStats<'_>) -> Result<(), DatabaseError> {
    let end_time_ms = Utc::now().timestamp_millis();

    sqlx::query(
        "UPDATE runs
         SET end_time_ms = ?, total_inputs = ?, skipped = ?, attempted = ?, succeeded = ?,
             failed = ?, interrupted = ?, elapsed_seconds = ?
         WHERE run_id = ?",
    )
    .bind(end_time_ms)
    .bind(stats.total_inputs)
    .bind(stats.skipped)
    .bind(stats.attempted)
    .bind(stats.succeeded)
    .bind(stats.failed)
    .bind(stats.interrupted)
    .bind(stats.elapsed_seconds)
    .bind(stats.run_id)
    .execute(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(())
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Unique identifier for this run (e.g., "run_1765150444953").
    pub run_id: String,
    pub collection: String,
    /// Crate version that performed the run.
    pub version: String,
    /// Start time as milliseconds since Unix epoch.
    pub start_time_ms: i64,
    pub end_time_ms: Option<i64>,
    pub total_inputs: i64,
    pub succeeded: i64,
    pub failed: i64,
    pub interrupted: bool,
    pub elapsed_seconds: Option<f64>,
}

/// Finished runs, most recent first.
///
/// # Example
///
/// ```no_run
/// use storage_prices::query_run_history;
/// use sqlx::SqlitePool;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = SqlitePool::connect("sqlite:./storage_prices.db").await?;
/// for run in query_run_history(&pool, Some(10)).await? {
///     println!("Run {}: {} succeeded, {} failed", run.run_id, run.succeeded, run.failed);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn query_run_history(
    pool: &SqlitePool,
    limit: Option<usize>,
) -> Result<Vec<RunSummary>, DatabaseError> {
    let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    let rows = sqlx::query(
        "SELECT run_id, collection, version, start_time_ms, end_time_ms, total_inputs,
                succeeded, failed, interrupted, elapsed_seconds
         FROM runs
         WHERE end_time_ms IS NOT NULL
         ORDER BY start_time_ms DESC
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(rows
        .into_iter()
        .map(|row| RunSummary {
            run_id: row.get("run_id"),
            collection: row.get("collection"),
            version: row.get("version"),
            start_time_ms: row.get("start_time_ms"),
            end_time_ms: row.get("end_time_ms"),
            total_inputs: row.get::<Option<i64>, _>("total_inputs").unwrap_or(0),
            succeeded: row.get::<Option<i64>, _>("succeeded").unwrap_or(0),
            failed: row.get::<Option<i64>, _>("failed").unwrap_or(0),
            interrupted: row.get("interrupted"),
            elapsed_seconds: row.get("elapsed_seconds"),
        })
        .collect())
}
