//! Retry loop: run attempts until one succeeds or the policy says stop.

use std::time::{Duration, Instant};

use super::classify::AttemptOutcome;
use super::error::FetchError;
use super::policy::{RequestConfig, RetryDecision};
use crate::cancel::CancelToken;

/// Granularity at which a backoff sleep notices cancellation.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Waits out a backoff delay.
pub trait Sleeper: Send + Sync {
    /// Sleep for `delay`. Returns false if `cancel` fired first.
    fn sleep(&self, delay: Duration, cancel: &CancelToken) -> bool;
}

/// Blocks the current thread in short slices, checking the cancel token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration, cancel: &CancelToken) -> bool {
        let deadline = Instant::now() + delay;
        loop {
            if cancel.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(CANCEL_POLL_INTERVAL));
        }
    }
}

/// Runs `attempt_fn` (given the 0-based attempt index) until it succeeds or
/// the budget in `config` says to stop. Attempts are strictly sequential.
///
/// `Terminal` outcomes end the loop immediately regardless of remaining
/// budget; `Retryable` ones sleep `backoff(attempt)` first.
pub fn run_with_retry<F, S>(
    config: &RequestConfig,
    cancel: &CancelToken,
    sleeper: &S,
    mut attempt_fn: F,
) -> Result<String, FetchError>
where
    F: FnMut(u32) -> AttemptOutcome,
    S: Sleeper + ?Sized,
{
    let max_attempts = config.max_attempts();
    let mut attempt = 0u32;
    loop {
        if cancel.is_cancelled() {
            tracing::debug!(attempt, "request cancelled before attempt");
            return Err(FetchError::Cancelled);
        }

        let err = match attempt_fn(attempt) {
            AttemptOutcome::Success(body) => {
                if attempt > 0 {
                    tracing::info!(attempt, max_attempts, "retry succeeded");
                }
                return Ok(body);
            }
            AttemptOutcome::Terminal(e) => {
                tracing::debug!(attempt, max_attempts, error = %e, "terminal failure");
                return Err(e);
            }
            AttemptOutcome::Retryable(e) => e,
        };

        match config.decide(attempt, &err) {
            RetryDecision::NoRetry => {
                tracing::warn!(attempts = attempt + 1, error = %err, "retry budget exhausted");
                return Err(err);
            }
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, backing off"
                );
                if !sleeper.sleep(delay, cancel) {
                    return Err(FetchError::Cancelled);
                }
                attempt += 1;
            }
        }
    }
}
