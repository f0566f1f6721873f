//! Backoff schedule.

use std::time::Duration;

use crate::config::{RETRY_INITIAL_DELAY_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_MS};

/// Attempt budget and backoff parameters for one zip code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, initial attempt included. Never less than 1 in practice.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Cap for any single delay.
    pub max_delay: Duration,
    /// Scale every delay by a random factor in `[0, 1)`.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Nominal delay before retry number `retry_index` (zero-based):
    /// `min(base_delay * 2^retry_index, max_delay)`.
    pub fn backoff_delay(&self, retry_index: u32) -> Duration {
        1u32.checked_shl(retry_index)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// The nominal delays of a run that exhausts the whole budget.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts.saturating_sub(1)).map(move |k| self.backoff_delay(k))
    }

    /// Time actually slept for a nominal delay.
    pub(crate) fn sleep_duration(&self, nominal: Duration) -> Duration {
        if self.jitter {
            tokio_retry::strategy::jitter(nominal)
        } else {
            nominal
        }
    }
}
