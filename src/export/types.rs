//! Export types and options.

use std::path::PathBuf;

use clap::ValueEnum;

/// Export format options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (flattened view for Excel/Sheets)
    Csv,
    /// JSONL format (one full document per line)
    Jsonl,
}

/// Options for exporting a collection.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Database path
    pub db_path: PathBuf,
    /// Collection to export
    pub collection: String,
    /// Output file path (or stdout if None)
    pub output: Option<PathBuf>,
    /// Export format
    pub format: ExportFormat,
}
