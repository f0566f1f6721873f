//! Retry state machine.
//!
//! Pure transition logic; the controller drives it and does the sleeping.

use std::time::Duration;

use super::policy::RetryPolicy;

/// Where a retry sequence currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Nothing attempted yet.
    Pending,
    /// Attempt number `attempt` (1-based) is running.
    InFlight { attempt: u32 },
    /// Attempt `attempt` failed; waiting `delay` before the next one.
    Waiting { attempt: u32, delay: Duration },
    /// Terminal: an attempt succeeded.
    Succeeded { attempts: u32 },
    /// Terminal: the attempt budget is exhausted.
    Failed { attempts: u32 },
}

/// Inputs that move the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryEvent {
    Start,
    AttemptSucceeded,
    AttemptFailed,
    DelayElapsed,
}

/// Explicit retry state machine over a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryMachine {
    policy: RetryPolicy,
    state: RetryState,
}

impl RetryMachine {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::Pending,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> u32 {
        match self.state {
            RetryState::Pending => 0,
            RetryState::InFlight { attempt } | RetryState::Waiting { attempt, .. } => attempt,
            RetryState::Succeeded { attempts } | RetryState::Failed { attempts } => attempts,
        }
    }

    /// Applies `event` and returns the new state.
    ///
    /// Events that make no sense in the current state leave it unchanged.
    pub fn transition(&mut self, event: RetryEvent) -> RetryState {
        let max_attempts = self.policy.max_attempts.max(1);
        let next = match (self.state, event) {
            (RetryState::Pending, RetryEvent::Start) => RetryState::InFlight { attempt: 1 },
            (RetryState::InFlight { attempt }, RetryEvent::AttemptSucceeded) => {
                RetryState::Succeeded { attempts: attempt }
            }
            (RetryState::InFlight { attempt }, RetryEvent::AttemptFailed) => {
                if attempt >= max_attempts {
                    RetryState::Failed { attempts: attempt }
                } else {
                    RetryState::Waiting {
                        attempt,
                        delay: self.policy.backoff_delay(attempt - 1),
                    }
                }
            }
            (RetryState::Waiting { attempt, .. }, RetryEvent::DelayElapsed) => {
                RetryState::InFlight {
                    attempt: attempt + 1,
                }
            }
            (state, event) => {
                log::warn!("Ignoring retry event {:?} in state {:?}", event, state);
                state
            }
        };
        self.state = next;
        next
    }
}
