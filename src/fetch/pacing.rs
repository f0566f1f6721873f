//! Random pauses between zip codes.

use std::time::Duration;

use log::info;
use rand::Rng;

/// A random duration in `[min, max]`, or `min` when the range is empty.
pub(crate) fn random_delay(min: Duration, max: Duration) -> Duration {
    let min_ms = min.as_millis() as u64;
    let max_ms = max.as_millis() as u64;
    if max_ms > min_ms {
        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    } else {
        min
    }
}

/// Extended pause after every `every` processed zip codes.
///
/// `every == 0` disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongBreak {
    pub every: usize,
    pub min: Duration,
    pub max: Duration,
}

impl LongBreak {
    /// True once `processed` reaches a multiple of `every` and zip codes remain.
    pub fn is_due(&self, processed: usize, remaining: usize) -> bool {
        self.every > 0 && processed > 0 && remaining > 0 && processed % self.every == 0
    }

    /// Sleeps a random duration within the break range.
    pub async fn take(&self) -> Duration {
        let pause = random_delay(self.min, self.max);
        info!("Taking a {:.0} second break...", pause.as_secs_f64());
        tokio::time::sleep(pause).await;
        pause
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every(n: usize) -> LongBreak {
        LongBreak {
            every: n,
            min: Duration::from_secs(120),
            max: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_break_due_on_multiples_only() {
        let pacing = every(200);
        assert!(!pacing.is_due(0, 500));
        assert!(!pacing.is_due(199, 300));
        assert!(pacing.is_due(200, 300));
        assert!(!pacing.is_due(201, 299));
        assert!(pacing.is_due(400, 100));
    }

    #[test]
    fn test_no_break_after_last_zip() {
        assert!(!every(200).is_due(200, 0));
    }

    #[test]
    fn test_zero_disables_breaks() {
        let pacing = every(0);
        for processed in [1, 200, 1000] {
            assert!(!pacing.is_due(processed, 10));
        }
    }

    #[test]
    fn test_random_delay_with_empty_range() {
        let fixed = Duration::from_millis(250);
        assert_eq!(random_delay(fixed, fixed), fixed);
        assert_eq!(random_delay(fixed, Duration::ZERO), fixed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_break_sleeps_within_range() {
        let pacing = every(200);
        for _ in 0..5 {
            let start = tokio::time::Instant::now();
            let pause = pacing.take().await;
            assert!(pause >= Duration::from_secs(120) && pause <= Duration::from_secs(300));
            assert!(start.elapsed() >= pause);
        }
    }
}
