//! Scrape run orchestration.
//!
//! Zip codes are processed one at a time, in input order. Each one is
//! either stored and checkpointed, recorded as a failure, or (on
//! interruption) left untouched for the next run. A long break follows
//! every `--long-break-every` processed zip codes.

mod finalize;
mod init;
mod resources;
mod task;

use std::path::PathBuf;

use anyhow::Result;
use log::info;
use tokio_util::sync::CancellationToken;

use crate::app::{is_progress_checkpoint, log_progress, shutdown_gracefully, spawn_ctrl_c_listener};
use crate::config::{Config, FailOn};

use finalize::finalize_scrape;
use init::init_scrape_resources;
use resources::{LoopCounters, ScrapeResources};
use task::{fetch_with_retries, handle_failure, handle_success, ZipOutcome};

/// Results of a scrape run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    /// Run identifier (format: `run_<timestamp_millis>`)
    pub run_id: String,
    /// Valid, de-duplicated zip codes in the input file
    pub total_inputs: usize,
    /// Zip codes already complete before this run
    pub skipped: usize,
    /// Zip codes processed to a final outcome this run
    pub attempted: usize,
    pub succeeded: usize,
    /// Zip codes that exhausted their retries or timed out
    pub failed: usize,
    /// True if the run stopped before processing every pending zip code
    pub interrupted: bool,
    pub elapsed_seconds: f64,
    /// Path to the SQLite document store
    pub db_path: PathBuf,
}

impl ScrapeReport {
    /// Failed share of attempted zip codes, in percent.
    pub fn failure_percentage(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.failed as f64 * 100.0 / self.attempted as f64
        }
    }
}

/// Process exit code for a finished run under the `--fail-on` policy.
///
/// 0 when the policy holds, 2 when it is violated, 3 for
/// [`FailOn::PctGreaterThan`] when nothing was attempted.
pub fn evaluate_exit_code(fail_on: FailOn, pct_threshold: u8, report: &ScrapeReport) -> i32 {
    match fail_on {
        FailOn::Never => 0,
        FailOn::AnyFailure => {
            if report.failed > 0 {
                2
            } else {
                0
            }
        }
        FailOn::PctGreaterThan => {
            if report.attempted == 0 {
                return 3;
            }
            if report.failure_percentage() > f64::from(pct_threshold) {
                2
            } else {
                0
            }
        }
    }
}

/// Runs a scrape with the provided configuration.
///
/// Ctrl-C stops the run between zip codes; everything already stored stays
/// checkpointed.
///
/// # Errors
///
/// Returns an error if initialization fails (bad configuration, unreadable
/// input, store or proxy file problems) or if writing a document or
/// checkpoint fails. Per-zip-code scraping failures are not errors; they are
/// counted in the report.
///
/// # Example
///
/// ```no_run
/// use storage_prices::{run_scrape, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     file: PathBuf::from("zips.csv"),
///     ..Default::default()
/// };
/// let report = run_scrape(config).await?;
/// println!("{} succeeded, {} failed", report.succeeded, report.failed);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config) -> Result<ScrapeReport> {
    let cancel = CancellationToken::new();
    let listener = spawn_ctrl_c_listener(cancel.clone());
    let result = run_scrape_with_cancel(config, cancel.clone()).await;
    shutdown_gracefully(cancel, listener).await;
    result
}

/// Like [`run_scrape`], stopping when `cancel` is cancelled instead of on
/// Ctrl-C.
pub async fn run_scrape_with_cancel(
    config: Config,
    cancel: CancellationToken,
) -> Result<ScrapeReport> {
    let mut resources = init_scrape_resources(config).await?;
    let mut counters = LoopCounters::default();

    let loop_result = scrape_loop(&mut resources, &cancel, &mut counters).await;

    finalize_scrape(resources, counters, loop_result).await
}

async fn scrape_loop(
    resources: &mut ScrapeResources,
    cancel: &CancellationToken,
    counters: &mut LoopCounters,
) -> Result<()> {
    let pending = resources.pending.clone();
    let total = pending.len();
    let long_break = resources.config.long_break();

    for zip_code in &pending {
        if cancel.is_cancelled() {
            counters.interrupted = true;
            break;
        }

        let shared: &ScrapeResources = resources;
        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            outcome = async {
                shared.session.politeness_delay().await;
                fetch_with_retries(shared, zip_code).await
            } => Some(outcome),
        };
        let Some(outcome) = outcome else {
            info!("Interrupted while processing zip {zip_code}; it stays pending");
            counters.interrupted = true;
            break;
        };

        counters.attempted += 1;
        match outcome {
            ZipOutcome::Succeeded { record, attempts } => {
                handle_success(resources, &record, attempts).await?;
                counters.succeeded += 1;
            }
            ZipOutcome::Failed {
                attempts,
                error_type,
                message,
            } => {
                handle_failure(resources, zip_code, attempts, error_type, &message).await?;
                counters.failed += 1;
            }
        }

        if is_progress_checkpoint(counters.attempted) {
            log_progress(
                resources.start_time,
                counters.attempted,
                total,
                counters.succeeded,
                counters.failed,
            );
        }

        if long_break.is_due(counters.attempted, total - counters.attempted) {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Interrupted during break after {} zip codes", counters.attempted);
                    counters.interrupted = true;
                    break;
                }
                _ = long_break.take() => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(attempted: usize, failed: usize) -> ScrapeReport {
        ScrapeReport {
            run_id: "run_1".to_string(),
            total_inputs: attempted,
            skipped: 0,
            attempted,
            succeeded: attempted - failed,
            failed,
            interrupted: false,
            elapsed_seconds: 1.0,
            db_path: PathBuf::from("prices.db"),
        }
    }

    #[test]
    fn test_failure_percentage() {
        assert_eq!(report(0, 0).failure_percentage(), 0.0);
        assert_eq!(report(4, 1).failure_percentage(), 25.0);
        assert_eq!(report(3, 3).failure_percentage(), 100.0);
    }

    #[test]
    fn test_exit_code_policies() {
        assert_eq!(evaluate_exit_code(FailOn::Never, 0, &report(4, 4)), 0);
        assert_eq!(evaluate_exit_code(FailOn::AnyFailure, 0, &report(4, 0)), 0);
        assert_eq!(evaluate_exit_code(FailOn::AnyFailure, 0, &report(4, 1)), 2);
        assert_eq!(evaluate_exit_code(FailOn::PctGreaterThan, 10, &report(0, 0)), 3);
        assert_eq!(evaluate_exit_code(FailOn::PctGreaterThan, 25, &report(4, 1)), 0);
        assert_eq!(evaluate_exit_code(FailOn::PctGreaterThan, 24, &report(4, 1)), 2);
    }
}
