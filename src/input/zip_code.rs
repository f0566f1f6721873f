//! Validated postal code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::InputError;

const ZIP_LEN: usize = 5;

/// A five-digit US postal code.
///
/// Construction goes through [`ZipCode::parse`], which trims whitespace,
/// left-pads purely numeric inputs shorter than five digits (spreadsheets
/// drop leading zeros) and reduces ZIP+4 codes to their first five digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZipCode(String);

impl ZipCode {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        let base = match trimmed.split_once('-') {
            Some((head, plus4))
                if plus4.len() == 4 && plus4.bytes().all(|b| b.is_ascii_digit()) =>
            {
                head
            }
            _ => trimmed,
        };

        if base.is_empty() || base.len() > ZIP_LEN || !base.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InputError::InvalidZipCode(raw.to_string()));
        }
        Ok(ZipCode(format!("{base:0>width$}", width = ZIP_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ZipCode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZipCode::parse(s)
    }
}

impl TryFrom<String> for ZipCode {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ZipCode::parse(&value)
    }
}

impl From<ZipCode> for String {
    fn from(zip: ZipCode) -> Self {
        zip.0
    }
}
