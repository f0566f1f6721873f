//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};
use thiserror::Error;

use crate::config::constants::*;
use crate::fetch::LongBreak;
use crate::retry::RetryPolicy;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How the proxy pool hands out endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProxyRotation {
    /// Cycle through the list in order
    RoundRobin,
    /// Pick a random endpoint for every request
    Random,
}

/// Exit code policy evaluated against the scrape report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Always exit 0 when the run completes
    Never,
    /// Exit 2 if any zip code failed terminally
    AnyFailure,
    /// Exit 2 if the failure percentage exceeds `--fail-on-pct-threshold`
    PctGreaterThan,
}

/// Configuration validation failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("retry base delay ({base_ms}ms) exceeds the retry cap ({cap_ms}ms)")]
    BaseDelayAboveCap { base_ms: u64, cap_ms: u64 },

    #[error("min delay ({min_ms}ms) exceeds max delay ({max_ms}ms)")]
    InvertedDelayRange { min_ms: u64, max_ms: u64 },

    #[error("long break minimum ({min_secs}s) exceeds its maximum ({max_secs}s)")]
    InvertedLongBreakRange { min_secs: u64, max_secs: u64 },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("collection name must not be empty")]
    EmptyCollection,

    #[error("invalid {field} URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Scrape configuration.
///
/// Used both as the `scrape` subcommand arguments and as the library entry
/// point configuration, so it can be built programmatically:
///
/// ```no_run
/// use storage_prices::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("zips.csv"),
///     max_attempts: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// CSV file with one column of zip codes
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Document store path (SQLite file)
    #[arg(long, env = "STORAGE_PRICES_DB_PATH", default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Collection the price documents are written to
    #[arg(long, env = "STORAGE_PRICES_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Quote endpoint receiving the form POST
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Calculator page sent as referer and used for session warm-up
    #[arg(long, default_value = DEFAULT_REFERER)]
    pub referer: String,

    /// Proxy list file (one `host:port`, `user:pass@host:port` or URL per line)
    #[arg(long)]
    pub proxies: Option<PathBuf>,

    /// Proxy rotation: round-robin|random
    #[arg(long, value_enum, default_value_t = ProxyRotation::RoundRobin)]
    pub proxy_rotation: ProxyRotation,

    /// Keep progress in this JSON side file instead of the document store
    #[arg(long)]
    pub progress_file: Option<PathBuf>,

    /// Forget previous progress for the collection before starting
    #[arg(long)]
    pub fresh: bool,

    /// Maximum attempts per zip code (initial attempt included)
    #[arg(long, default_value_t = RETRY_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Delay before the first retry, doubled on each further retry
    #[arg(long, default_value_t = RETRY_INITIAL_DELAY_MS)]
    pub retry_base_delay_ms: u64,

    /// Cap for a single retry delay
    #[arg(long, default_value_t = RETRY_MAX_DELAY_MS)]
    pub retry_max_delay_ms: u64,

    /// Randomize retry delays (each delay scaled by a factor in [0, 1))
    #[arg(long)]
    pub retry_jitter: bool,

    /// Lower bound of the random delay before each request
    #[arg(long, default_value_t = REQUEST_MIN_DELAY_MS)]
    pub min_delay_ms: u64,

    /// Upper bound of the random delay before each request
    #[arg(long, default_value_t = REQUEST_MAX_DELAY_MS)]
    pub max_delay_ms: u64,

    /// Take a long break after every N processed zip codes (0 disables)
    #[arg(long, default_value_t = LONG_BREAK_EVERY)]
    pub long_break_every: usize,

    /// Lower bound of a long break, in seconds
    #[arg(long, default_value_t = LONG_BREAK_MIN_SECS)]
    pub long_break_min_secs: u64,

    /// Upper bound of a long break, in seconds
    #[arg(long, default_value_t = LONG_BREAK_MAX_SECS)]
    pub long_break_max_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Timeout for all attempts of one zip code, in seconds
    #[arg(long, default_value_t = ZIP_PROCESSING_TIMEOUT_SECS)]
    pub zip_timeout_seconds: u64,

    /// Process at most this many pending zip codes
    #[arg(long)]
    pub limit: Option<usize>,

    /// Exit code policy: never|any-failure|pct-greater-than
    #[arg(long, value_enum, default_value_t = FailOn::Never)]
    pub fail_on: FailOn,

    /// Failure percentage threshold used by `--fail-on pct-greater-than`
    #[arg(long, default_value_t = 10)]
    pub fail_on_pct_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("zip_codes.csv"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            collection: DEFAULT_COLLECTION.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            proxies: None,
            proxy_rotation: ProxyRotation::RoundRobin,
            progress_file: None,
            fresh: false,
            max_attempts: RETRY_MAX_ATTEMPTS,
            retry_base_delay_ms: RETRY_INITIAL_DELAY_MS,
            retry_max_delay_ms: RETRY_MAX_DELAY_MS,
            retry_jitter: false,
            min_delay_ms: REQUEST_MIN_DELAY_MS,
            max_delay_ms: REQUEST_MAX_DELAY_MS,
            long_break_every: LONG_BREAK_EVERY,
            long_break_min_secs: LONG_BREAK_MIN_SECS,
            long_break_max_secs: LONG_BREAK_MAX_SECS,
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            zip_timeout_seconds: ZIP_PROCESSING_TIMEOUT_SECS,
            limit: None,
            fail_on: FailOn::Never,
            fail_on_pct_threshold: 10,
        }
    }
}

impl Config {
    /// Checks option combinations that clap cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.retry_base_delay_ms > self.retry_max_delay_ms {
            return Err(ConfigError::BaseDelayAboveCap {
                base_ms: self.retry_base_delay_ms,
                cap_ms: self.retry_max_delay_ms,
            });
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::InvertedDelayRange {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        if self.long_break_min_secs > self.long_break_max_secs {
            return Err(ConfigError::InvertedLongBreakRange {
                min_secs: self.long_break_min_secs,
                max_secs: self.long_break_max_secs,
            });
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout("timeout_seconds"));
        }
        if self.zip_timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout("zip_timeout_seconds"));
        }
        if self.collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        check_http_url("endpoint", &self.endpoint)?;
        check_http_url("referer", &self.referer)?;
        Ok(())
    }

    /// Retry policy assembled from the retry options.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            jitter: self.retry_jitter,
        }
    }

    /// Long break settings assembled from the break options.
    pub fn long_break(&self) -> LongBreak {
        LongBreak {
            every: self.long_break_every,
            min: Duration::from_secs(self.long_break_min_secs),
            max: Duration::from_secs(self.long_break_max_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn zip_timeout(&self) -> Duration {
        Duration::from_secs(self.zip_timeout_seconds)
    }

    /// Longest a zip code can take when every attempt runs into the request
    /// timeout: all nominal backoff delays plus `max_attempts` timeouts.
    pub fn worst_case_zip_duration(&self) -> Duration {
        let policy = self.retry_policy();
        let backoff: Duration = policy.delays().sum();
        backoff.saturating_add(
            self.request_timeout()
                .saturating_mul(self.max_attempts),
        )
    }
}

fn check_http_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };
    let parsed = url::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_base_delay_ms, 1000);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.collection, "zipcodes");
        assert_eq!(config.proxy_rotation, ProxyRotation::RoundRobin);
        assert!(config.progress_file.is_none());
        assert!(!config.fresh);
        assert_eq!(config.db_path, PathBuf::from("./storage_prices.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = Config {
            max_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroAttempts));
    }

    #[test]
    fn test_validate_rejects_base_above_cap() {
        let config = Config {
            retry_base_delay_ms: 5000,
            retry_max_delay_ms: 1000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BaseDelayAboveCap { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_delay_range() {
        let config = Config {
            min_delay_ms: 10,
            max_delay_ms: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedDelayRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_long_break_range() {
        let config = Config {
            long_break_min_secs: 300,
            long_break_max_secs: 120,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedLongBreakRange {
                min_secs: 300,
                max_secs: 120
            })
        );
    }

    #[test]
    fn test_worst_case_zip_duration() {
        // 3 x 30s requests plus 1s and 2s backoff
        assert_eq!(
            Config::default().worst_case_zip_duration(),
            Duration::from_secs(93)
        );

        let config = Config {
            max_attempts: 10,
            ..Default::default()
        };
        assert!(config.worst_case_zip_duration() > config.zip_timeout());
    }

    #[test]
    fn test_long_break_from_config() {
        let pacing = Config::default().long_break();
        assert_eq!(pacing.every, 200);
        assert_eq!(pacing.min, Duration::from_secs(120));
        assert_eq!(pacing.max, Duration::from_secs(300));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroTimeout("timeout_seconds"))
        );

        let config = Config {
            zip_timeout_seconds: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroTimeout("zip_timeout_seconds"))
        );
    }

    #[test]
    fn test_validate_rejects_blank_collection() {
        let config = Config {
            collection: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyCollection));
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let config = Config {
            endpoint: "ftp://example.com/quote".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "endpoint",
                ..
            })
        ));

        let config = Config {
            referer: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "referer",
                ..
            })
        ));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config {
            max_attempts: 5,
            retry_base_delay_ms: 250,
            retry_max_delay_ms: 4000,
            retry_jitter: true,
            ..Default::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_millis(4000));
        assert!(policy.jitter);
    }
}
