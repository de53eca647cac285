//! Cancellation for in-flight docs requests.
//!
//! A [`CancelToken`] is threaded through every attempt of one request: the
//! retry loop checks it before each attempt and while backing off, and the
//! curl progress callback checks it during a transfer. [`CancelRegistry`]
//! maps protocol request ids to tokens so a cancel notification can reach
//! the request it names.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Shared cancel flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Registry of request id -> cancel token for one connection.
///
/// Entries live only while their request runs; callers must `unregister`
/// when the request finishes, success or failure.
#[derive(Debug, Default)]
pub struct CancelRegistry {
    requests: RwLock<HashMap<String, CancelToken>>,
}

impl CancelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request and return the token to pass to the fetch client.
    /// Returns `None` if `request_id` is already in flight; the running
    /// request keeps its entry.
    pub fn register(&self, request_id: &str) -> Option<CancelToken> {
        let mut requests = self
            .requests
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if requests.contains_key(request_id) {
            return None;
        }
        let token = CancelToken::new();
        requests.insert(request_id.to_string(), token.clone());
        Some(token)
    }

    pub fn unregister(&self, request_id: &str) {
        self.requests
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(request_id);
    }

    /// Cancel a running request. Returns false if the id is unknown
    /// (already finished or never started).
    pub fn request_cancel(&self, request_id: &str) -> bool {
        match self
            .requests
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(request_id)
        {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel everything still running (shutdown).
    pub fn cancel_all(&self) {
        for token in self
            .requests
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
        {
            token.cancel();
        }
    }

    pub fn in_flight(&self) -> usize {
        self.requests
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
