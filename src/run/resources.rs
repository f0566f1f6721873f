//! Resources shared by the scrape loop.

use std::time::Instant;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::error_handling::ProcessingStats;
use crate::fetch::HttpSession;
use crate::input::ZipCode;
use crate::progress::ProgressTracker;
use crate::retry::RetryController;

/// Everything a scrape run needs once initialization succeeded.
pub struct ScrapeResources {
    /// Document store (also holds the progress table for the database backend)
    pub pool: SqlitePool,
    pub tracker: ProgressTracker,
    pub session: HttpSession,
    pub controller: RetryController,
    /// Failed-attempt counters by category
    pub error_stats: ProcessingStats,
    /// Zip codes to process this run, in input order
    pub pending: Vec<ZipCode>,
    /// Valid, de-duplicated inputs
    pub total_inputs: usize,
    /// Inputs already complete when the run started
    pub skipped: usize,
    pub run_id: String,
    pub start_time: Instant,
    pub config: Config,
}

/// Counters accumulated by the scrape loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopCounters {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub interrupted: bool,
}
