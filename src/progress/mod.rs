//! Resume checkpoints.
//!
//! The tracker holds the set of zip codes whose documents are persisted.
//! Marking persists to the backend first and only then updates the in-memory
//! set, so a failed write never makes a zip code look complete.

mod database;
mod file;

use std::collections::HashSet;
use std::path::PathBuf;

use sqlx::SqlitePool;

use crate::error_handling::ProgressError;
use crate::input::ZipCode;

/// Where completed zip codes are persisted.
#[derive(Debug, Clone)]
pub enum ProgressBackend {
    /// `scrape_progress` table of the document store.
    Database { pool: SqlitePool },
    /// JSON side file.
    File { path: PathBuf },
}

/// Completed zip codes of one collection.
#[derive(Debug)]
pub struct ProgressTracker {
    backend: ProgressBackend,
    collection: String,
    completed: HashSet<ZipCode>,
}

impl ProgressTracker {
    /// Loads the persisted state for `collection`.
    pub async fn open(
        backend: ProgressBackend,
        collection: &str,
    ) -> Result<Self, ProgressError> {
        let completed = match &backend {
            ProgressBackend::Database { pool } => database::load_completed(pool, collection).await?,
            ProgressBackend::File { path } => file::load_completed(path, collection).await?,
        };
        if !completed.is_empty() {
            log::info!(
                "Resuming: {} zip codes already complete in '{}'",
                completed.len(),
                collection
            );
        }
        Ok(Self {
            backend,
            collection: collection.to_string(),
            completed,
        })
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            ProgressBackend::Database { .. } => "database",
            ProgressBackend::File { .. } => "file",
        }
    }

    pub fn is_complete(&self, zip_code: &ZipCode) -> bool {
        self.completed.contains(zip_code)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Inputs not yet complete, in input order.
    pub fn pending(&self, zip_codes: &[ZipCode]) -> Vec<ZipCode> {
        zip_codes
            .iter()
            .filter(|zip| !self.is_complete(zip))
            .cloned()
            .collect()
    }

    /// Durably marks `zip_code` complete. Marking an already complete zip
    /// code is a no-op.
    pub async fn mark_complete(
        &mut self,
        zip_code: &ZipCode,
        run_id: Option<&str>,
    ) -> Result<(), ProgressError> {
        if self.is_complete(zip_code) {
            return Ok(());
        }
        match &self.backend {
            ProgressBackend::Database { pool } => {
                database::mark(pool, &self.collection, zip_code, run_id).await?;
            }
            ProgressBackend::File { path } => {
                let mut next = self.completed.clone();
                next.insert(zip_code.clone());
                file::save(path, &self.collection, &next).await?;
            }
        }
        self.completed.insert(zip_code.clone());
        Ok(())
    }

    /// Forgets every completed zip code of the collection.
    pub async fn reset(&mut self) -> Result<(), ProgressError> {
        match &self.backend {
            ProgressBackend::Database { pool } => {
                let removed = database::clear(pool, &self.collection).await?;
                log::info!("Cleared {removed} progress entries for '{}'", self.collection);
            }
            ProgressBackend::File { path } => {
                file::remove(path).await?;
                log::info!("Removed progress file {}", path.display());
            }
        }
        self.completed.clear();
        Ok(())
    }
}
