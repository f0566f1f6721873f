//! Error categorization.
//!
//! Maps attempt failures onto [`ErrorType`] so they can be counted.

use reqwest::StatusCode;

use super::stats::ProcessingStats;
use super::types::{ErrorType, FetchError, ParseError};
use crate::config::{HTTP_STATUS_FORBIDDEN, HTTP_STATUS_TOO_MANY_REQUESTS};

/// Categorizes a `reqwest::Error` into an `ErrorType`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(status) = error.status() {
        return categorize_status(status);
    }

    if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_body() || error.is_decode() {
        ErrorType::HttpRequestBodyError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Categorizes a non-success HTTP status.
pub fn categorize_status(status: StatusCode) -> ErrorType {
    match status.as_u16() {
        HTTP_STATUS_FORBIDDEN => ErrorType::HttpRequestBotDetectionError,
        HTTP_STATUS_TOO_MANY_REQUESTS => ErrorType::HttpRequestTooManyRequests,
        _ if status.is_server_error() => ErrorType::HttpRequestServerError,
        _ => ErrorType::HttpRequestStatusError,
    }
}

/// Categorizes a failed request attempt.
pub fn categorize_fetch_error(error: &FetchError) -> ErrorType {
    match error {
        FetchError::Transport(e) => categorize_reqwest_error(e),
        FetchError::Status(status) => categorize_status(*status),
        FetchError::Parse(ParseError::LimitReached) => ErrorType::ResponseLimitReached,
        FetchError::Parse(ParseError::InvalidJson(_)) => ErrorType::ResponseInvalidJson,
        FetchError::Parse(ParseError::Unsuccessful) => ErrorType::ResponseUnsuccessful,
        FetchError::Parse(ParseError::MissingField(_)) => ErrorType::ResponseMissingField,
    }
}

/// Records one failed attempt in the statistics.
pub fn update_error_stats(stats: &ProcessingStats, error: &FetchError) {
    stats.increment_error(categorize_fetch_error(error));
}
