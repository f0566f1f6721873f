//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, retry defaults, endpoints)
//! - CLI option types and parsing
//! - Validation of option combinations

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ConfigError, FailOn, LogFormat, LogLevel, ProxyRotation};
