//! Backoff for transient generation failures.
//!
//! Only [`Unavailable`](super::GenerationErrorKind::Unavailable) failures
//! are re-sent. Authentication and malformed-response errors fail
//! immediately, since resending the same request cannot fix them.

use std::time::Duration;

/// Per-attempt shortening applied when jitter is on, cycled by attempt.
const JITTER_FACTORS: [f64; 4] = [0.75, 0.9, 0.6, 0.85];

/// How many times to re-send a request the service was too busy for, and
/// how long to wait in between. The wait doubles after each attempt up to
/// `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Re-sends after the first attempt. `0` disables retrying.
    pub max_retries: u32,
    /// Wait before the first re-send.
    pub base_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
    /// Shorten waits by a fixed per-attempt factor so parallel clients
    /// don't re-send in lockstep.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Default timings with `max_retries` re-sends.
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// True if a request that has already failed `failures` times may be
    /// sent again.
    pub fn allows_retry(&self, failures: u32) -> bool {
        failures < self.max_retries
    }

    /// Wait before re-send number `attempt` (0 = first re-send).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let doubled = 2u32
            .checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(self.max_delay);
        let wait = doubled.min(self.max_delay);

        if self.jitter {
            wait.mul_f64(JITTER_FACTORS[attempt as usize % JITTER_FACTORS.len()])
        } else {
            wait
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady() -> RetryConfig {
        RetryConfig {
            jitter: false,
            ..RetryConfig::with_retries(4)
        }
    }

    #[test]
    fn retrying_is_off_by_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 0);
        assert!(!config.allows_retry(0));
    }

    #[test]
    fn allows_exactly_max_retries() {
        let config = RetryConfig::with_retries(2);
        assert!(config.allows_retry(0));
        assert!(config.allows_retry(1));
        assert!(!config.allows_retry(2));
    }

    #[test]
    fn waits_double_until_capped() {
        let config = steady();
        assert_eq!(config.backoff(0), Duration::from_millis(500));
        assert_eq!(config.backoff(1), Duration::from_secs(1));
        assert_eq!(config.backoff(2), Duration::from_secs(2));
        assert_eq!(config.backoff(4), Duration::from_secs(8));
        assert_eq!(config.backoff(5), Duration::from_secs(8));
    }

    #[test]
    fn huge_attempt_numbers_stay_capped() {
        assert_eq!(steady().backoff(200), Duration::from_secs(8));
    }

    #[test]
    fn jitter_only_shortens() {
        let jittered = RetryConfig::with_retries(4);
        for attempt in 0..8 {
            assert!(jittered.backoff(attempt) < steady().backoff(attempt));
        }
        let third = jittered.backoff(2);
        assert!(third > Duration::from_millis(1190) && third < Duration::from_millis(1210));
    }
}
