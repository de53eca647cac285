//! Per-connection state. Lives exactly as long as one stdio session.

use apifox_core::key::ApiKey;
use std::collections::HashSet;
use std::sync::Mutex;

/// Keys whose API list was fetched on this connection. Used to point a
/// failed detail lookup at the list tool when the id likely came from nowhere.
#[derive(Debug, Default)]
pub struct Session {
    listed: Mutex<HashSet<ApiKey>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_listed(&self, key: &ApiKey) {
        self.listed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.clone());
    }

    pub fn was_listed(&self, key: &ApiKey) -> bool {
        self.listed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apifox_core::key::extract_key;

    #[test]
    fn tracks_listed_keys_only() {
        let session = Session::new();
        let a = extract_key("123e4567-e89b-12d3-a456-426614174000").unwrap();
        let b = extract_key("9b2f0c1e-4d3a-4f6b-8a7c-0e1d2c3b4a59").unwrap();
        assert!(!session.was_listed(&a));
        session.mark_listed(&a);
        assert!(session.was_listed(&a));
        assert!(!session.was_listed(&b));
    }

    #[test]
    fn key_case_does_not_matter() {
        let session = Session::new();
        let upper = extract_key("123E4567-E89B-12D3-A456-426614174000").unwrap();
        let lower = extract_key("https://host/apidoc/shared/123e4567-e89b-12d3-a456-426614174000").unwrap();
        session.mark_listed(&upper);
        assert!(session.was_listed(&lower));
    }
}
