//! Fetch error taxonomy shared by the key resolver, the retry loop and the formatter.

use thiserror::Error;

/// Every way a docs request can fail.
///
/// Retry decisions are made by matching on the variant (see
/// [`FetchError::is_retryable`]); higher layers only render the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Malformed key, URL or API id. Detected before any network call.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// HTTP 4xx. Will not self-resolve on retry.
    #[error("HTTP {status}{}: client error", reason_suffix(.reason))]
    ClientError { status: u32, reason: String },

    /// HTTP 5xx. Retried until the budget runs out.
    #[error("HTTP {status}{}: server error", reason_suffix(.reason))]
    ServerError { status: u32, reason: String },

    /// Final status outside 2xx/4xx/5xx (e.g. a 3xx left after redirects).
    #[error("HTTP {status}: unexpected response status")]
    UnexpectedStatus { status: u32 },

    /// Attempt exceeded its deadline. Never retried with the same budget.
    #[error("request timed out ({timeout_ms}ms)")]
    Timeout { timeout_ms: u64 },

    /// 2xx with a blank body.
    #[error("API returned empty content")]
    EmptyResponse,

    /// DNS, connect, reset and other transport-level failures.
    #[error("network request failed: {0}")]
    Network(String),

    /// The caller abandoned the request.
    #[error("request cancelled")]
    Cancelled,
}

fn reason_suffix(reason: &str) -> String {
    if reason.is_empty() {
        String::new()
    } else {
        format!(" {}", reason)
    }
}

impl FetchError {
    /// True for failures that may go away on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::ServerError { .. } | FetchError::Network(_) => true,
            FetchError::InvalidParams(_)
            | FetchError::ClientError { .. }
            | FetchError::UnexpectedStatus { .. }
            | FetchError::Timeout { .. }
            | FetchError::EmptyResponse
            | FetchError::Cancelled => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::ClientError { status, .. }
            | FetchError::ServerError { status, .. }
            | FetchError::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}
