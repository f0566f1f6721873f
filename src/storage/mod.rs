// storage/mod.rs
// Document store operations

pub mod documents;
pub mod failure;
pub mod migrations;
pub mod pool;
pub mod runs;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use documents::{count_documents, get_price_record, stream_price_records, upsert_price_record};
pub use failure::{query_run_failures, record_scrape_failure, FailureRecord, FailureSummary};
pub use migrations::run_migrations;
pub use pool::{init_db_pool_with_path, init_memory_pool};
pub use runs::{insert_run_metadata, query_run_history, update_run_stats, RunMetadata, RunStats, RunSummary};

use std::path::Path;

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

/// Opens (creating if needed) and migrates the store at `db_path`.
pub async fn open_store(db_path: &Path) -> Result<SqlitePool, DatabaseError> {
    let pool = init_db_pool_with_path(db_path).await?;
    if let Err(e) = run_migrations(&pool).await {
        pool.close().await;
        return Err(e);
    }
    Ok(pool)
}
