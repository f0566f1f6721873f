//! End-of-run statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats};
use crate::run::ScrapeReport;

/// Logs the failed-attempt counts per category.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    if total_errors == 0 {
        return;
    }

    info!("Failed attempt counts ({} total):", total_errors);
    for error_type in ErrorType::iter() {
        let count = error_stats.get_error_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}

/// One-line summary of a run.
pub fn run_summary_line(report: &ScrapeReport) -> String {
    let mut line = format!(
        "Processed {} zip code{} ({} succeeded, {} failed, {} already complete) in {:.1}s - run {} in {}",
        report.attempted,
        if report.attempted == 1 { "" } else { "s" },
        report.succeeded,
        report.failed,
        report.skipped,
        report.elapsed_seconds,
        report.run_id,
        report.db_path.display()
    );
    if report.interrupted {
        line.push_str(" (interrupted)");
    }
    line
}

pub fn print_run_summary(report: &ScrapeReport) {
    info!("{}", run_summary_line(report));
}
