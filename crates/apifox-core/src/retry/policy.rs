use std::time::Duration;

use super::error::FetchError;

/// Delay before the retry that follows attempt 0.
pub const BASE_BACKOFF_DELAY: Duration = Duration::from_millis(1000);

/// Upper bound on any single backoff delay (equals the delay after attempt 5).
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(32);

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Per-call request budget: deadline per attempt and number of retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestConfig {
    timeout: Duration,
    max_retries: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            max_retries: 2,
        }
    }
}

impl RequestConfig {
    /// Builds a budget; `None` when `timeout` is zero.
    pub fn new(timeout: Duration, max_retries: u32) -> Option<Self> {
        if timeout.is_zero() {
            return None;
        }
        Some(Self {
            timeout,
            max_retries,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Decide what happens after attempt `attempt` (0-based) failed with `err`.
    pub fn decide(&self, attempt: u32, err: &FetchError) -> RetryDecision {
        if attempt.saturating_add(1) >= self.max_attempts() || !err.is_retryable() {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(backoff(attempt))
    }
}

/// `1000ms * 2^attempt`, no jitter, capped at [`MAX_BACKOFF_DELAY`].
pub fn backoff(attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    BASE_BACKOFF_DELAY
        .saturating_mul(factor)
        .min(MAX_BACKOFF_DELAY)
}
