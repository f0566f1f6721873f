//! Zip code input loading.
//!
//! Reads the CSV input file into an ordered, de-duplicated list of
//! [`ZipCode`]s. Bad rows are skipped with a warning rather than failing the
//! whole run.

mod zip_code;

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use thiserror::Error;

pub use zip_code::ZipCode;

/// Header names recognized as the zip column, compared case-insensitively.
const ZIP_COLUMN_NAMES: &[&str] = &["zip_code", "zipcode", "zip", "postal_code"];

/// Input loading failures.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to open input file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid zip code '{0}'")]
    InvalidZipCode(String),
}

/// Zip codes read from an input file, in file order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadedZipCodes {
    pub zip_codes: Vec<ZipCode>,
    /// Rows whose zip cell was invalid.
    pub invalid: usize,
    /// Rows repeating an earlier zip code.
    pub duplicates: usize,
}

/// Loads zip codes from a CSV file.
pub fn load_zip_codes(path: &Path) -> Result<LoadedZipCodes, InputError> {
    let file = std::fs::File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = read_zip_codes(file)?;
    log::info!(
        "Loaded {} zip codes from {} ({} invalid, {} duplicates skipped)",
        loaded.zip_codes.len(),
        path.display(),
        loaded.invalid,
        loaded.duplicates
    );
    Ok(loaded)
}

/// Reads zip codes from any CSV source.
///
/// A first row whose zip cell is not a zip code is treated as a header; if it
/// names one of the known zip columns that column is used, otherwise column 0.
pub fn read_zip_codes<R: Read>(reader: R) -> Result<LoadedZipCodes, InputError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader);

    let mut loaded = LoadedZipCodes::default();
    let mut seen = HashSet::new();
    let mut column = 0;

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;

        if index == 0 {
            if let Some(header_column) = header_zip_column(&record) {
                debug!("Input header found, zip column {header_column}");
                column = header_column;
                continue;
            }
            if looks_like_header(&record) {
                debug!("Input header without a known zip column, using column 0");
                continue;
            }
        }

        let cell = record.get(column).unwrap_or("");
        if cell.is_empty() {
            continue;
        }

        match ZipCode::parse(cell) {
            Ok(zip) => {
                if seen.insert(zip.clone()) {
                    loaded.zip_codes.push(zip);
                } else {
                    loaded.duplicates += 1;
                }
            }
            Err(e) => {
                warn!("Skipping input row {}: {}", index + 1, e);
                loaded.invalid += 1;
            }
        }
    }

    Ok(loaded)
}

fn header_zip_column(record: &StringRecord) -> Option<usize> {
    record.iter().position(|cell| {
        ZIP_COLUMN_NAMES
            .iter()
            .any(|name| cell.eq_ignore_ascii_case(name))
    })
}

fn looks_like_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|cell| cell.chars().any(|c| c.is_ascii_alphabetic()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn zips(loaded: &LoadedZipCodes) -> Vec<&str> {
        loaded.zip_codes.iter().map(ZipCode::as_str).collect()
    }

    #[test]
    fn test_reads_headerless_single_column() {
        let loaded = read_zip_codes("10001\n10002\n78201\n".as_bytes()).unwrap();
        assert_eq!(zips(&loaded), vec!["10001", "10002", "78201"]);
        assert_eq!(loaded.invalid, 0);
    }

    #[test]
    fn test_uses_named_column() {
        let input = "city,Zip_Code,state\nNew York,10001,NY\nBoston,2134,MA\n";
        let loaded = read_zip_codes(input.as_bytes()).unwrap();
        assert_eq!(zips(&loaded), vec!["10001", "02134"]);
    }

    #[test]
    fn test_unknown_header_falls_back_to_first_column() {
        let input = "codes\n10001\n10002\n";
        let loaded = read_zip_codes(input.as_bytes()).unwrap();
        assert_eq!(zips(&loaded), vec!["10001", "10002"]);
        assert_eq!(loaded.invalid, 0);
    }

    #[test]
    fn test_skips_blanks_comments_and_invalid_rows() {
        let input = "zip\n10001\n\n# comment\n ,\nabcde\n123456\n10002\n";
        let loaded = read_zip_codes(input.as_bytes()).unwrap();
        assert_eq!(zips(&loaded), vec!["10001", "10002"]);
        assert_eq!(loaded.invalid, 2);
    }

    #[test]
    fn test_drops_duplicates_keeping_first_occurrence() {
        let input = "10002\n10001\n10002\n10001\n78201\n";
        let loaded = read_zip_codes(input.as_bytes()).unwrap();
        assert_eq!(zips(&loaded), vec!["10002", "10001", "78201"]);
        assert_eq!(loaded.duplicates, 2);
    }

    #[test]
    fn test_load_zip_codes_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "zip_code").unwrap();
        writeln!(file, "10001").unwrap();
        writeln!(file, "10002").unwrap();

        let loaded = load_zip_codes(file.path()).unwrap();
        assert_eq!(zips(&loaded), vec!["10001", "10002"]);
    }

    #[test]
    fn test_load_zip_codes_missing_file() {
        let result = load_zip_codes(Path::new("/nonexistent/zips.csv"));
        assert!(matches!(result, Err(InputError::Open { .. })));
    }

    #[test]
    fn test_empty_input() {
        let loaded = read_zip_codes("".as_bytes()).unwrap();
        assert!(loaded.zip_codes.is_empty());
    }
}
