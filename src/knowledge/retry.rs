// file: src/knowledge/retry.rs
// description: bounded retry with exponential backoff for knowledge service calls
// reference: https://docs.rs/reqwest/latest/reqwest/struct.Error.html

use crate::config::KnowledgeConfig;
use reqwest::StatusCode;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_backoff: Duration) -> Self {
        Self {
            max_retries,
            base_backoff,
        }
    }

    pub fn from_config(config: &KnowledgeConfig) -> Self {
        Self::new(config.max_retries, config.retry_backoff())
    }

    /// Delay before retry number `attempt + 1`: base, 2x base, 4x base, ...
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    pub fn is_transient_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    pub fn is_transient_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || (err.is_request() && !err.is_builder())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, Duration::from_secs(1))
    }
}
