//! storage_prices library: resumable self-storage price collection
//!
//! This library reads zip codes from a CSV file, requests a storage quote for
//! each one through a rotating pool of proxies with a fresh identity per
//! attempt, and stores one price document per zip code in a SQLite document
//! store. Completed zip codes are checkpointed, so an interrupted run resumes
//! where it stopped.
//!
//! # Example
//!
//! ```no_run
//! use storage_prices::{run_scrape, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("zips.csv"),
//!     max_attempts: 5,
//!     ..Default::default()
//! };
//!
//! let report = run_scrape(config).await?;
//! println!("{} of {} zip codes stored, {} failed",
//!          report.succeeded, report.attempted, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod cli;
pub mod config;
pub mod error_handling;
pub mod export;
mod fetch;
pub mod identity;
pub mod initialization;
pub mod input;
mod models;
pub mod parse;
pub mod progress;
pub mod proxy;
pub mod retry;
mod run;
pub mod storage;

// Re-export public API
pub use config::{Config, FailOn, LogFormat, LogLevel, ProxyRotation};
pub use fetch::{HttpSession, LongBreak, SessionOptions};
pub use input::ZipCode;
pub use models::PriceRecord;
pub use retry::{RetryController, RetryPolicy};
pub use run::{evaluate_exit_code, run_scrape, run_scrape_with_cancel, ScrapeReport};
pub use storage::{query_run_history, run_migrations, RunSummary};
