//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions for every concern of a run
//! - Failure categorization of request attempts
//! - Per-category failure counters

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_fetch_error, categorize_reqwest_error, categorize_status, update_error_stats,
};
pub use stats::ProcessingStats;
pub use types::{
    DatabaseError, ErrorType, FetchError, InitializationError, ParseError, ProgressError,
};
