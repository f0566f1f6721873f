//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `storage_prices` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use storage_prices::cli::{Cli, Command};
use storage_prices::export::run_export;
use storage_prices::initialization::init_logger_with;
use storage_prices::{evaluate_exit_code, run_scrape};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), falling back
    // to a .env next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    let (log_level, log_format) = cli.command.log_settings();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match cli.command {
        Command::Scrape(config) => {
            let fail_on = config.fail_on;
            let pct_threshold = config.fail_on_pct_threshold;
            match run_scrape(config).await {
                Ok(report) => {
                    println!(
                        "Processed {} zip code{} ({} succeeded, {} failed, {} already complete) in {:.1}s",
                        report.attempted,
                        if report.attempted == 1 { "" } else { "s" },
                        report.succeeded,
                        report.failed,
                        report.skipped,
                        report.elapsed_seconds
                    );
                    println!("Results saved in {}", report.db_path.display());
                    let code = evaluate_exit_code(fail_on, pct_threshold, &report);
                    if code != 0 {
                        process::exit(code);
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("storage_prices error: {:#}", e);
                    process::exit(1);
                }
            }
        }
        Command::Export(args) => match run_export(&args.into()).await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("storage_prices export error: {:#}", e);
                process::exit(1);
            }
        },
    }
}
