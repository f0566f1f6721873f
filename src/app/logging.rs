//! Progress logging utilities.

use log::info;
use std::time::Instant;

use crate::config::LOGGING_INTERVAL;

/// Percentage of attempted zip codes that succeeded, 0 when nothing was attempted.
pub fn success_rate(succeeded: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        succeeded as f64 * 100.0 / attempted as f64
    }
}

/// True every [`LOGGING_INTERVAL`] processed zip codes.
pub fn is_progress_checkpoint(processed: usize) -> bool {
    processed > 0 && processed % LOGGING_INTERVAL == 0
}

/// Logs progress through the pending zip codes.
pub fn log_progress(
    start_time: Instant,
    processed: usize,
    pending: usize,
    succeeded: usize,
    failed: usize,
) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        processed as f64 * 60.0 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Progress: {}/{} - Success: {}, Failed: {}, Success Rate: {:.1}% (~{:.1} zips/min)",
        processed,
        pending,
        succeeded,
        failed,
        success_rate(succeeded, processed),
        rate
    );
}
