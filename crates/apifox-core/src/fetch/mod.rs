//! Retrying HTTP GET client.
//!
//! Uses the curl crate (libcurl) with one easy handle per attempt. Each
//! attempt gets its own deadline; the retry loop in [`crate::retry`] decides
//! whether another attempt follows. The transport sits behind
//! [`HttpTransport`] so the loop can be driven by scripted responses.

mod parse;

use std::str;
use std::sync::Arc;
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::retry::{
    classify_curl_error, classify_response, run_with_retry, FetchError, RequestConfig, Sleeper,
    ThreadSleeper,
};

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    /// Reason phrase from the status line; empty when absent.
    pub reason: String,
    pub body: String,
}

/// One network call. Implementations must give up after `timeout` and
/// should stop early once `cancel` fires.
pub trait HttpTransport: Send + Sync {
    fn get(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<HttpResponse, FetchError>;
}

/// libcurl transport.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    user_agent: String,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            user_agent: format!("apifox-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpTransport for CurlTransport {
    fn get(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<HttpResponse, FetchError> {
        let curl_err = |e: curl::Error| classify_curl_error(&e, timeout);
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(curl_err)?;
        easy.get(true).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(10).map_err(curl_err)?;
        easy.useragent(&self.user_agent).map_err(curl_err)?;
        // Whole-attempt deadline: connect, send and body read all count.
        easy.timeout(timeout).map_err(curl_err)?;
        // Needed for the progress callback to run.
        easy.progress(true).map_err(curl_err)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        headers.push(s.trim_end().to_string());
                    }
                    true
                })
                .map_err(curl_err)?;
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            // Returning false aborts the transfer (CURLE_ABORTED_BY_CALLBACK).
            transfer
                .progress_function(|_, _, _, _| !cancel.is_cancelled())
                .map_err(curl_err)?;
            transfer.perform().map_err(curl_err)?;
        }

        let status = easy.response_code().map_err(curl_err)?;
        Ok(HttpResponse {
            status,
            reason: parse::reason_phrase(&headers),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

/// Bounded-retry GET client. Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new(Arc::new(CurlTransport::default()))
    }
}

impl FetchClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    /// Replace the backoff sleeper (tests record delays instead of waiting).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// GET `url` within the budget in `config`; returns the body text.
    ///
    /// Blocks the calling thread; call from `spawn_blocking` in async code.
    pub fn request(
        &self,
        url: &str,
        config: &RequestConfig,
        cancel: &CancelToken,
    ) -> Result<String, FetchError> {
        let timeout = config.timeout();
        tracing::debug!(
            url,
            timeout_ms = timeout.as_millis() as u64,
            max_retries = config.max_retries(),
            "starting request"
        );
        run_with_retry(config, cancel, self.sleeper.as_ref(), |attempt| {
            match self.transport.get(url, timeout, cancel) {
                Ok(resp) => {
                    tracing::debug!(attempt, status = resp.status, bytes = resp.body.len(), "response");
                    classify_response(resp.status, &resp.reason, resp.body)
                }
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "transport failure");
                    Err::<String, FetchError>(e).into()
                }
            }
        })
    }
}
