//! Main application modules.
//!
//! This module provides progress logging, shutdown handling, and statistics
//! printing used by the scrape loop.

pub mod logging;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use logging::{is_progress_checkpoint, log_progress};
pub use shutdown::{shutdown_gracefully, spawn_ctrl_c_listener};
pub use statistics::{print_error_statistics, print_run_summary};
