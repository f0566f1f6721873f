//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, LogFormat, LogLevel, DB_PATH, DEFAULT_COLLECTION};
use crate::export::{ExportFormat, ExportOptions};

/// Collects self-storage unit prices per zip code.
#[derive(Debug, Parser)]
#[command(name = "storage_prices", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape prices for every pending zip code in a CSV file
    Scrape(Config),
    /// Write a stored collection as CSV or JSONL
    Export(ExportArgs),
}

/// Arguments of the `export` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Document store path (SQLite file)
    #[arg(long, env = "STORAGE_PRICES_DB_PATH", default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Collection to export
    #[arg(long, env = "STORAGE_PRICES_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Output format: csv|jsonl
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Output file (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<ExportArgs> for ExportOptions {
    fn from(args: ExportArgs) -> Self {
        Self {
            db_path: args.db_path,
            collection: args.collection,
            output: args.output,
            format: args.format,
        }
    }
}

impl Command {
    /// Logging settings of the chosen subcommand.
    pub fn log_settings(&self) -> (LogLevel, LogFormat) {
        match self {
            Command::Scrape(config) => (config.log_level.clone(), config.log_format.clone()),
            Command::Export(args) => (args.log_level.clone(), args.log_format.clone()),
        }
    }
}
