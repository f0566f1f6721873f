//! Per-zip-code processing.
//!
//! One zip code goes through the politeness delay, then the retry controller
//! (bounded by the zip processing timeout), then either the store write and
//! checkpoint or the failure record.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::error_handling::{categorize_fetch_error, update_error_stats, ErrorType, FetchError};
use crate::input::ZipCode;
use crate::models::PriceRecord;
use crate::storage::{record_scrape_failure, upsert_price_record, FailureRecord};

use super::resources::ScrapeResources;

/// Final outcome of one zip code.
#[derive(Debug)]
pub enum ZipOutcome {
    Succeeded {
        record: PriceRecord,
        attempts: u32,
    },
    Failed {
        attempts: u32,
        error_type: ErrorType,
        message: String,
    },
}

/// Runs every attempt for `zip_code` and returns the terminal outcome.
///
/// Each failed attempt is counted in the error statistics. A timeout of the
/// whole sequence counts as one more failure.
pub async fn fetch_with_retries(resources: &ScrapeResources, zip_code: &ZipCode) -> ZipOutcome {
    let session = &resources.session;
    let error_stats = &resources.error_stats;
    let attempts_made = AtomicU32::new(0);
    let attempts_ref = &attempts_made;

    let retried = resources.controller.execute(|attempt| async move {
        attempts_ref.store(attempt, Ordering::SeqCst);
        let result = session.fetch_quote(zip_code, attempt).await;
        if let Err(e) = &result {
            update_error_stats(error_stats, e);
        }
        result
    });

    let zip_timeout = resources.config.zip_timeout();
    match tokio::time::timeout(zip_timeout, retried).await {
        Ok(outcome) => match outcome.result {
            Ok(record) => ZipOutcome::Succeeded {
                record,
                attempts: outcome.attempts,
            },
            Err(error) => failed(outcome.attempts, &error),
        },
        Err(_) => {
            error_stats.increment_error(ErrorType::ZipProcessingTimeout);
            ZipOutcome::Failed {
                attempts: attempts_made.load(Ordering::SeqCst),
                error_type: ErrorType::ZipProcessingTimeout,
                message: timeout_message(zip_timeout),
            }
        }
    }
}

fn failed(attempts: u32, error: &FetchError) -> ZipOutcome {
    ZipOutcome::Failed {
        attempts,
        error_type: categorize_fetch_error(error),
        message: error.to_string(),
    }
}

fn timeout_message(timeout: Duration) -> String {
    format!("processing timed out after {}s", timeout.as_secs())
}

/// Persists a successful quote, then checkpoints the zip code.
///
/// The checkpoint is written only after the document, so a crash in between
/// re-scrapes the zip code instead of losing it.
///
/// # Errors
///
/// Store and checkpoint failures are fatal for the run.
pub async fn handle_success(
    resources: &mut ScrapeResources,
    record: &PriceRecord,
    attempts: u32,
) -> Result<()> {
    upsert_price_record(&resources.pool, &resources.config.collection, record)
        .await
        .with_context(|| format!("Failed to store document for zip {}", record.zip_code))?;
    resources
        .tracker
        .mark_complete(&record.zip_code, Some(&resources.run_id))
        .await
        .with_context(|| format!("Failed to checkpoint zip {}", record.zip_code))?;

    info!(
        "Zip {}: total ${:.2} ({} unit price{}, {} attempt{})",
        record.zip_code,
        record.total_price,
        record.prices.len(),
        if record.prices.len() == 1 { "" } else { "s" },
        attempts,
        if attempts == 1 { "" } else { "s" }
    );
    for (size, price) in record.units() {
        debug!("Zip {}: {} at ${:.2}", record.zip_code, size, price);
    }
    Ok(())
}

/// Records a terminal failure. The zip code stays unmarked so the next run
/// retries it.
///
/// # Errors
///
/// Failing to write the failure record is fatal for the run.
pub async fn handle_failure(
    resources: &ScrapeResources,
    zip_code: &ZipCode,
    attempts: u32,
    error_type: ErrorType,
    message: &str,
) -> Result<()> {
    warn!(
        "Zip {}: failed after {} attempt{} ({}): {}",
        zip_code,
        attempts,
        if attempts == 1 { "" } else { "s" },
        error_type,
        message
    );

    let failure = FailureRecord {
        run_id: &resources.run_id,
        collection: &resources.config.collection,
        zip_code,
        attempts,
        error_type,
        error_message: message,
    };
    record_scrape_failure(&resources.pool, &failure)
        .await
        .with_context(|| format!("Failed to record failure for zip {zip_code}"))?;
    debug!("Recorded failure for zip {}", zip_code);
    Ok(())
}
