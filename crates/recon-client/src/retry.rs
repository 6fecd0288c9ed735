//! Linear retry policy for transient remote failures

use std::time::Duration;

use backoff::backoff::Backoff;

/// Waits `delay`, `2 * delay`, ... between attempts, giving up after
/// `max_retries` retries.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    delay: Duration,
    max_retries: u32,
    retries: u32,
}

impl LinearBackoff {
    pub fn new(delay: Duration, max_retries: u32) -> Self {
        Self {
            delay,
            max_retries,
            retries: 0,
        }
    }
}

impl Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.retries = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries >= self.max_retries {
            return None;
        }
        self.retries += 1;
        Some(self.delay * self.retries)
    }
}
