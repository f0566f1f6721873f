//! Scrape resource initialization.

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::error_handling::ProcessingStats;
use crate::fetch::{HttpSession, SessionOptions};
use crate::input::load_zip_codes;
use crate::progress::{ProgressBackend, ProgressTracker};
use crate::proxy::{load_proxies, ProxyPool};
use crate::retry::RetryController;
use crate::storage::{insert_run_metadata, open_store, RunMetadata};

use super::resources::ScrapeResources;

/// Initialize all resources needed for a scrape.
///
/// Steps, in order:
/// 1. Validate configuration
/// 2. Load and normalize the zip code inputs
/// 3. Open the document store and run migrations
/// 4. Open the progress tracker (reset it with `--fresh`)
/// 5. Compute the pending zip codes and apply `--limit`
/// 6. Load proxies and build the HTTP session
/// 7. Record the run metadata
///
/// The pool is closed again if any step after opening it fails.
///
/// # Errors
///
/// Returns an error if any step fails. Nothing has been requested from the
/// quote endpoint at that point.
pub async fn init_scrape_resources(config: Config) -> Result<ScrapeResources> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    let worst_case = config.worst_case_zip_duration();
    if worst_case > config.zip_timeout() {
        warn!(
            "Retries for one zip code can take up to {}s, longer than the {}s zip timeout; later attempts may be cut short",
            worst_case.as_secs(),
            config.zip_timeout_seconds
        );
    }

    let loaded = load_zip_codes(&config.file)
        .with_context(|| format!("Failed to load zip codes from {}", config.file.display()))?;

    let pool = open_store(&config.db_path)
        .await
        .context("Failed to open document store")?;

    match init_with_pool(config, pool.clone(), loaded.zip_codes).await {
        Ok(resources) => Ok(resources),
        Err(e) => {
            pool.close().await;
            Err(e)
        }
    }
}

async fn init_with_pool(
    config: Config,
    pool: SqlitePool,
    zip_codes: Vec<crate::input::ZipCode>,
) -> Result<ScrapeResources> {
    let backend = match &config.progress_file {
        Some(path) => ProgressBackend::File { path: path.clone() },
        None => ProgressBackend::Database { pool: pool.clone() },
    };
    let mut tracker = ProgressTracker::open(backend, &config.collection)
        .await
        .context("Failed to load scrape progress")?;
    if config.fresh {
        tracker
            .reset()
            .await
            .context("Failed to reset scrape progress")?;
    }

    let total_inputs = zip_codes.len();
    let mut pending = tracker.pending(&zip_codes);
    let skipped = total_inputs - pending.len();
    if let Some(limit) = config.limit {
        pending.truncate(limit);
    }
    info!(
        "{} zip codes in input, {} already complete, {} to process (progress: {})",
        total_inputs,
        skipped,
        pending.len(),
        tracker.backend_name()
    );

    let proxies = match &config.proxies {
        Some(path) => load_proxies(path)
            .with_context(|| format!("Failed to load proxies from {}", path.display()))?,
        None => Vec::new(),
    };
    let options = SessionOptions::from_config(&config)?;
    let session = HttpSession::new(options, ProxyPool::new(proxies, config.proxy_rotation))
        .context("Failed to initialize HTTP session")?;
    match session.proxy_count() {
        0 => info!("Sending requests directly (no proxies)"),
        count => info!(
            "Using {} proxies ({:?} rotation)",
            count, config.proxy_rotation
        ),
    }

    let start_time_epoch = Utc::now().timestamp_millis();
    let run_id = format!("run_{}", start_time_epoch);
    info!("Starting run: {}", run_id);

    let meta = RunMetadata {
        run_id: &run_id,
        collection: &config.collection,
        start_time_ms: start_time_epoch,
        version: env!("CARGO_PKG_VERSION"),
    };
    insert_run_metadata(&pool, &meta)
        .await
        .context("Failed to insert run metadata")?;

    Ok(ScrapeResources {
        pool,
        tracker,
        session,
        controller: RetryController::new(config.retry_policy()),
        error_stats: ProcessingStats::new(),
        pending,
        total_inputs,
        skipped,
        run_id,
        start_time: Instant::now(),
        config,
    })
}
