//! Client tuning

use std::time::Duration;

/// Timeouts, retry policy and page size of a [`MagentoClient`](crate::MagentoClient)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures
    pub retry_attempts: u32,
    /// Base delay; the n-th retry waits `n * retry_delay`
    pub retry_delay: Duration,
    /// Records requested per search page
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
            page_size: 100,
        }
    }
}
