//! Scrape finalization and cleanup.

use anyhow::{Context, Result};

use crate::app::{log_progress, print_error_statistics, print_run_summary};
use crate::storage::{update_run_stats, RunStats};

use super::resources::{LoopCounters, ScrapeResources};
use super::ScrapeReport;

/// Finalize a scrape run and produce the report.
///
/// Runs whether or not the loop ended in error:
/// 1. Log final progress
/// 2. Record the run counters
/// 3. Checkpoint the WAL file and close the pool
/// 4. Print error statistics and the run summary
///
/// # Errors
///
/// Returns the loop error if there was one, otherwise any error recording
/// the run counters.
pub async fn finalize_scrape(
    resources: ScrapeResources,
    counters: LoopCounters,
    loop_result: Result<()>,
) -> Result<ScrapeReport> {
    log_progress(
        resources.start_time,
        counters.attempted,
        resources.pending.len(),
        counters.succeeded,
        counters.failed,
    );

    let elapsed_seconds = resources.start_time.elapsed().as_secs_f64();
    let interrupted = counters.interrupted || loop_result.is_err();

    let stats = RunStats {
        run_id: &resources.run_id,
        total_inputs: count(resources.total_inputs),
        skipped: count(resources.skipped),
        attempted: count(counters.attempted),
        succeeded: count(counters.succeeded),
        failed: count(counters.failed),
        interrupted,
        elapsed_seconds,
    };
    let stats_result = update_run_stats(&resources.pool, &stats)
        .await
        .context("Failed to update run statistics");

    if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(&resources.pool)
        .await
    {
        log::warn!("Failed to checkpoint WAL file (this is non-critical): {}", e);
    }

    resources.pool.close().await;
    log::debug!("Database pool closed");

    loop_result?;
    stats_result?;

    print_error_statistics(&resources.error_stats);

    let report = ScrapeReport {
        run_id: resources.run_id,
        total_inputs: resources.total_inputs,
        skipped: resources.skipped,
        attempted: counters.attempted,
        succeeded: counters.succeeded,
        failed: counters.failed,
        interrupted,
        elapsed_seconds,
        db_path: resources.config.db_path,
    };
    print_run_summary(&report);
    Ok(report)
}

fn count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
