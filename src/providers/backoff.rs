use backon::BackoffBuilder;
use rand::Rng;
use std::time::Duration;

use crate::config::UpstreamConfig;

/// Retry schedule for upstream image calls.
///
/// Yields one delay per retry: before attempt `n + 1` the caller waits
/// `2^n * base_delay_ms` plus a uniform jitter in `[0, max_jitter_ms)`.
/// With `max_attempts` total attempts the schedule holds `max_attempts - 1`
/// delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayBackoffBuilder {
    max_attempts: usize,
    base_delay_ms: u64,
    max_jitter_ms: u64,
}

impl RelayBackoffBuilder {
    pub fn new(max_attempts: usize, base_delay_ms: u64, max_jitter_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
            max_jitter_ms,
        }
    }

    pub fn from_config(cfg: &UpstreamConfig) -> Self {
        Self::new(cfg.max_attempts, cfg.base_delay_ms, cfg.max_jitter_ms)
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Deterministic part of the delay before retry `n` (1-based).
    pub fn base_delay_for(&self, retry: usize) -> Duration {
        let exp = u32::try_from(retry).unwrap_or(u32::MAX).min(32);
        let factor = 2u64.saturating_pow(exp);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

impl Default for RelayBackoffBuilder {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default())
    }
}

impl BackoffBuilder for RelayBackoffBuilder {
    type Backoff = RelayBackoff;

    fn build(self) -> Self::Backoff {
        RelayBackoff {
            builder: self,
            retry: 1,
        }
    }
}

#[derive(Debug)]
pub struct RelayBackoff {
    builder: RelayBackoffBuilder,
    /// Number of the retry the next delay precedes.
    retry: usize,
}

impl Iterator for RelayBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.retry >= self.builder.max_attempts {
            return None;
        }

        let jitter = if self.builder.max_jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..self.builder.max_jitter_ms)
        };
        let delay = self.builder.base_delay_for(self.retry) + Duration::from_millis(jitter);
        self.retry += 1;
        Some(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_has_four_delays_within_bounds() {
        let builder = RelayBackoffBuilder::default();
        assert_eq!(builder.max_attempts(), 5);

        let delays: Vec<Duration> = builder.build().collect();
        assert_eq!(delays.len(), 4);

        for (i, delay) in delays.iter().enumerate() {
            let retry = i as u32 + 1;
            let floor = Duration::from_millis(2u64.pow(retry) * 1000);
            assert!(*delay >= floor, "retry {retry}: {delay:?} < {floor:?}");
            assert!(
                *delay < floor + Duration::from_millis(500),
                "retry {retry}: {delay:?} exceeds jitter bound"
            );
        }
    }

    #[test]
    fn zero_jitter_is_deterministic() {
        let delays: Vec<Duration> = RelayBackoffBuilder::new(4, 10, 0).build().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(20),
                Duration::from_millis(40),
                Duration::from_millis(80),
            ]
        );
    }

    #[test]
    fn single_attempt_never_retries() {
        assert_eq!(RelayBackoffBuilder::new(1, 1000, 500).build().count(), 0);
        // Zero is clamped to one attempt.
        assert_eq!(RelayBackoffBuilder::new(0, 1000, 500).max_attempts(), 1);
    }

    #[test]
    fn huge_retry_numbers_saturate() {
        let builder = RelayBackoffBuilder::new(5, u64::MAX / 2, 0);
        assert_eq!(builder.base_delay_for(200), Duration::from_millis(u64::MAX));
    }
}
