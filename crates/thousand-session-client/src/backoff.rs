// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reconnect pacing: doubling delay, capped, optionally bounded attempts.

use std::time::Duration;

/// Exponential reconnect backoff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectBackoff {
    initial: Duration,
    max: Duration,
    max_attempts: Option<u32>,
    attempt: u32,
    delay: Duration,
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(8))
    }
}

impl ReconnectBackoff {
    /// Unbounded backoff starting at `initial`, never waiting more than `max`.
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            max_attempts: None,
            attempt: 0,
            delay: initial,
        }
    }

    /// Give up after `attempts` consecutive failures.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Delay before the next attempt, or `None` once attempts are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.max_attempts.is_some_and(|max| self.attempt >= max) {
            return None;
        }
        self.attempt += 1;
        let delay = self.delay;
        self.delay = (self.delay * 2).min(self.max);
        Some(delay)
    }

    /// Forget past failures (call once a connection opens).
    pub fn reset(&mut self) {
        self.attempt = 0;
        self.delay = self.initial;
    }

    /// Consecutive attempts since the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}
