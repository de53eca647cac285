//! Classify HTTP responses and curl errors into attempt outcomes.

use std::time::Duration;

use super::error::FetchError;

/// Result of one attempt, already sorted into retry buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    Retryable(FetchError),
    Terminal(FetchError),
}

impl From<Result<String, FetchError>> for AttemptOutcome {
    fn from(result: Result<String, FetchError>) -> Self {
        match result {
            Ok(body) => AttemptOutcome::Success(body),
            Err(e) if e.is_retryable() => AttemptOutcome::Retryable(e),
            Err(e) => AttemptOutcome::Terminal(e),
        }
    }
}

/// Classify a finished HTTP exchange.
///
/// A 2xx with a blank body is terminal: the server answered, the data is missing.
pub fn classify_response(status: u32, reason: &str, body: String) -> AttemptOutcome {
    let result = match status {
        200..=299 if body.trim().is_empty() => Err(FetchError::EmptyResponse),
        200..=299 => Ok(body),
        400..=499 => Err(FetchError::ClientError {
            status,
            reason: reason.to_string(),
        }),
        500..=599 => Err(FetchError::ServerError {
            status,
            reason: reason.to_string(),
        }),
        _ => Err(FetchError::UnexpectedStatus { status }),
    };
    result.into()
}

/// Map a curl transfer error onto the taxonomy.
pub fn classify_curl_error(e: &curl::Error, timeout: Duration) -> FetchError {
    if e.is_operation_timedout() {
        return FetchError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        };
    }
    if e.is_aborted_by_callback() {
        return FetchError::Cancelled;
    }
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return FetchError::InvalidParams(e.to_string());
    }
    FetchError::Network(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_with_body_succeeds() {
        assert_eq!(
            classify_response(200, "OK", "# APIs".into()),
            AttemptOutcome::Success("# APIs".into())
        );
    }

    #[test]
    fn blank_body_is_terminal_empty() {
        assert_eq!(
            classify_response(200, "OK", " \n\t ".into()),
            AttemptOutcome::Terminal(FetchError::EmptyResponse)
        );
        assert_eq!(
            classify_response(204, "No Content", String::new()),
            AttemptOutcome::Terminal(FetchError::EmptyResponse)
        );
    }

    #[test]
    fn http_4xx_terminal() {
        for status in [400, 401, 403, 404, 429, 499] {
            assert!(
                matches!(
                    classify_response(status, "", String::new()),
                    AttemptOutcome::Terminal(FetchError::ClientError { .. })
                ),
                "{status}"
            );
        }
    }

    #[test]
    fn http_5xx_retryable() {
        assert_eq!(
            classify_response(500, "Internal Server Error", "boom".into()),
            AttemptOutcome::Retryable(FetchError::ServerError {
                status: 500,
                reason: "Internal Server Error".into()
            })
        );
        assert!(matches!(
            classify_response(503, "", String::new()),
            AttemptOutcome::Retryable(_)
        ));
    }

    #[test]
    fn leftover_redirect_is_terminal() {
        assert_eq!(
            classify_response(302, "Found", String::new()),
            AttemptOutcome::Terminal(FetchError::UnexpectedStatus { status: 302 })
        );
    }

    #[test]
    fn curl_timeout_and_abort() {
        let timeout = Duration::from_millis(2500);
        let timed_out = curl::Error::new(28); // CURLE_OPERATION_TIMEDOUT
        assert_eq!(
            classify_curl_error(&timed_out, timeout),
            FetchError::Timeout { timeout_ms: 2500 }
        );
        let aborted = curl::Error::new(42); // CURLE_ABORTED_BY_CALLBACK
        assert_eq!(classify_curl_error(&aborted, timeout), FetchError::Cancelled);
        let refused = curl::Error::new(7); // CURLE_COULDNT_CONNECT
        assert!(matches!(
            classify_curl_error(&refused, timeout),
            FetchError::Network(_)
        ));
    }
}
