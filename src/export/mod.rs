//! Export functionality for stored price documents.
//!
//! Reads one collection from the SQLite document store, ordered by zip code,
//! and writes it as CSV (flattened) or JSONL (full documents).

mod csv;
mod jsonl;
mod output;
mod types;

use anyhow::{bail, Context, Result};

use crate::storage::open_store;

pub use self::csv::write_csv;
pub use jsonl::write_jsonl;
pub use types::{ExportFormat, ExportOptions};

/// Exports a collection to the configured destination.
///
/// # Returns
///
/// Returns the number of documents exported.
///
/// # Errors
///
/// Fails if the database does not exist, cannot be opened, contains a
/// document that does not decode, or the output cannot be written.
pub async fn run_export(opts: &ExportOptions) -> Result<usize> {
    if !opts.db_path.exists() {
        bail!("Database not found: {}", opts.db_path.display());
    }
    let pool = open_store(&opts.db_path)
        .await
        .context("Failed to open document store")?;

    let result = match output::open_output(opts.output.as_deref()) {
        Ok(out) => match opts.format {
            ExportFormat::Csv => write_csv(&pool, &opts.collection, out).await,
            ExportFormat::Jsonl => write_jsonl(&pool, &opts.collection, out).await,
        },
        Err(e) => Err(e),
    };
    pool.close().await;

    let count = result?;
    if let Some(path) = &opts.output {
        log::info!(
            "Exported {} document{} from '{}' to {}",
            count,
            if count == 1 { "" } else { "s" },
            opts.collection,
            path.display()
        );
    }
    Ok(count)
}
