//! Retry controller.
//!
//! Runs an attempt up to [`RetryPolicy::max_attempts`] times, sleeping an
//! exponentially growing delay between attempts. Every failure is retried;
//! the last error is surfaced once the budget is spent.

mod policy;
mod state;

use std::future::Future;
use std::time::Duration;

pub use policy::RetryPolicy;
pub use state::{RetryEvent, RetryMachine, RetryState};

/// Result of a retried operation.
///
/// `delays` holds what was actually slept between attempts, so with jitter
/// disabled it is a prefix of [`RetryPolicy::delays`].
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// The successful value, or the error of the final attempt.
    pub result: Result<T, E>,
    /// Attempts made, initial attempt included.
    pub attempts: u32,
    pub delays: Vec<Duration>,
}

impl<T, E> RetryOutcome<T, E> {
    /// Number of retries (attempts after the first).
    pub fn retry_count(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Drives a [`RetryMachine`] against an async operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `operation` until it succeeds or the attempt budget is exhausted.
    ///
    /// The closure receives the 1-based attempt number.
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut machine = RetryMachine::new(self.policy);
        let mut delays = Vec::new();
        machine.transition(RetryEvent::Start);
        let mut attempt = machine.attempts();

        loop {
            match operation(attempt).await {
                Ok(value) => {
                    machine.transition(RetryEvent::AttemptSucceeded);
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: machine.attempts(),
                        delays,
                    };
                }
                Err(error) => match machine.transition(RetryEvent::AttemptFailed) {
                    RetryState::Waiting {
                        attempt: failed_attempt,
                        delay,
                    } => {
                        let sleep_for = self.policy.sleep_duration(delay);
                        log::warn!(
                            "Attempt {}/{} failed: {}. Retrying in {:?}",
                            failed_attempt,
                            self.policy.max_attempts,
                            error,
                            sleep_for
                        );
                        tokio::time::sleep(sleep_for).await;
                        delays.push(sleep_for);
                        machine.transition(RetryEvent::DelayElapsed);
                        attempt = machine.attempts();
                    }
                    _ => {
                        log::debug!(
                            "Giving up after {} attempt(s): {}",
                            machine.attempts(),
                            error
                        );
                        return RetryOutcome {
                            result: Err(error),
                            attempts: machine.attempts(),
                            delays,
                        };
                    }
                },
            }
        }
    }
}
