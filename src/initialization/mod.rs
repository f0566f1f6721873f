//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON)
//! - HTTP clients (timeouts, cookies, proxies)

mod client;
mod logger;

// Re-export public API
pub use client::init_quote_client;
pub use logger::init_logger_with;
