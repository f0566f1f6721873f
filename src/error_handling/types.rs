//! Error type definitions.
//!
//! This module defines the error enums shared across the crate and the
//! failure categories counted during a run.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for document store operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A document could not be encoded or decoded.
    #[error("Document serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Reasons a quote response is rejected by the parser.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The site throttled the request.
    #[error("response reports limit_reached")]
    LimitReached,

    /// The body is not JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON did not carry `"success": true`.
    #[error("response did not report success")]
    Unsuccessful,

    /// A required field is absent or has the wrong type.
    #[error("response is missing field '{0}'")]
    MissingField(&'static str),
}

/// Failure of a single request attempt.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network-level failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] ReqwestError),

    /// The server answered with a non-success status code.
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// A 2xx response whose body could not be used.
    #[error("malformed response: {0}")]
    Parse(#[from] ParseError),
}

/// Error types for progress checkpoint operations.
#[derive(Error, Debug)]
pub enum ProgressError {
    /// The database backend failed.
    #[error("progress table error: {0}")]
    Database(#[from] sqlx::Error),

    /// Reading or writing the side file failed.
    #[error("progress file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The side file exists but cannot be decoded.
    #[error("progress file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The side file could not be encoded.
    #[error("progress state could not be encoded: {0}")]
    Encode(serde_json::Error),

    /// The side file belongs to another collection.
    #[error("progress file {path} tracks collection '{found}', not '{expected}'")]
    CollectionMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}

/// Categories of failed attempts, counted for the end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestBodyError,
    HttpRequestOtherError,
    HttpRequestBotDetectionError, // 403 Forbidden - typically bot detection
    HttpRequestTooManyRequests,
    HttpRequestServerError,
    HttpRequestStatusError,
    // Response content errors
    ResponseLimitReached,
    ResponseInvalidJson,
    ResponseUnsuccessful,
    ResponseMissingField,
    // Whole zip code
    ZipProcessingTimeout,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestBotDetectionError => "Bot detection (403 Forbidden)",
            ErrorType::HttpRequestTooManyRequests => "Too many requests (429)",
            ErrorType::HttpRequestServerError => "Server error (5xx)",
            ErrorType::HttpRequestStatusError => "Unexpected HTTP status",
            ErrorType::ResponseLimitReached => "Quote limit reached",
            ErrorType::ResponseInvalidJson => "Invalid JSON response",
            ErrorType::ResponseUnsuccessful => "Unsuccessful quote response",
            ErrorType::ResponseMissingField => "Missing price field",
            ErrorType::ZipProcessingTimeout => "Zip processing timeout",
        }
    }
}
