//! Configuration constants.
//!
//! Defaults for the CLI options plus fixed operational limits.

use std::time::Duration;

/// Default SQLite document store path.
pub const DB_PATH: &str = "./storage_prices.db";

/// Default collection holding the price documents.
pub const DEFAULT_COLLECTION: &str = "zipcodes";

/// Quote endpoint answering the form POST with JSON.
pub const DEFAULT_ENDPOINT: &str = "https://unitsstorage.com/san-antonio-tx/wp-admin/admin-ajax.php";

/// Calculator page the quote form lives on. Sent as `referer` and used to
/// warm up a refreshed session.
pub const DEFAULT_REFERER: &str = "https://unitsstorage.com/san-antonio-tx/storage-calculator/";

/// Log a progress line every this many processed zip codes.
pub const LOGGING_INTERVAL: usize = 10;

// Retry strategy
/// Maximum number of attempts per zip code (initial attempt included)
pub const RETRY_MAX_ATTEMPTS: u32 = 3;
/// Delay before the first retry in milliseconds; doubled on every further retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 1000;
/// Upper bound for a single backoff delay in milliseconds
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;

// Politeness delay before every request
/// Lower bound of the random pre-request delay in milliseconds
pub const REQUEST_MIN_DELAY_MS: u64 = 3000;
/// Upper bound of the random pre-request delay in milliseconds
pub const REQUEST_MAX_DELAY_MS: u64 = 10_000;

// Extended break between batches of zip codes
/// Take a long break after every this many processed zip codes (0 disables)
pub const LONG_BREAK_EVERY: usize = 200;
/// Lower bound of a long break in seconds
pub const LONG_BREAK_MIN_SECS: u64 = 120;
/// Upper bound of a long break in seconds
pub const LONG_BREAK_MAX_SECS: u64 = 300;

/// Per-request HTTP timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Bound on the whole retry sequence for one zip code, in seconds.
pub const ZIP_PROCESSING_TIMEOUT_SECS: u64 = 300;

/// Timeout for the warm-up GET issued after a session refresh.
pub const SESSION_WARMUP_TIMEOUT: Duration = Duration::from_secs(10);

/// The attempt (1-based) on which a 403 response triggers a session refresh.
pub const SESSION_REFRESH_ATTEMPT: u32 = 2;

/// Marker the site embeds in the body when it throttles quote requests.
pub const LIMIT_REACHED_MARKER: &str = "\"limit_reached\"";

/// Maximum stored length of a failure message (longer messages are truncated).
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_FORBIDDEN: u16 = 403;
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
