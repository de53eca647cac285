//! Retry and backoff policy.
//!
//! This module holds the failure taxonomy, the per-call request budget,
//! response/transport classification and the sequential retry loop so that
//! the fetch client and its callers share one policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_response, AttemptOutcome};
pub use error::FetchError;
pub use policy::{
    backoff, RequestConfig, RetryDecision, BASE_BACKOFF_DELAY, MAX_BACKOFF_DELAY,
};
pub use run::{run_with_retry, Sleeper, ThreadSleeper};
