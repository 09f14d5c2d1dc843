//! Exponential backoff with jitter for status polling.

use std::time::Duration;

use rand::Rng;

use crate::config::ConfirmationConfig;

/// Stateful delay sequence: zero, then `base`, doubling up to `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    attempt: u32,
    base_ms: u64,
    max_ms: u64,
}

impl Backoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self {
            attempt: 0,
            base_ms,
            max_ms: max_ms.max(base_ms),
        }
    }

    pub fn from_config(config: &ConfirmationConfig) -> Self {
        Self::new(config.poll_interval_ms, config.max_poll_interval_ms)
    }

    /// Delay to sleep before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        let delay = delay_for(self.attempt, self.base_ms, self.max_ms);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }

    /// Attempts handed out so far.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }
}

fn delay_for(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exponent = (attempt - 1).min(32);
    let capped = base_ms.saturating_mul(2u64.saturating_pow(exponent)).min(max_ms);

    // Up to 10% jitter on top
    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped + jitter)
}
