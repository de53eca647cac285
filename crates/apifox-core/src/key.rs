//! Apifox key resolution.
//!
//! A shared doc is addressed by a UUID key. Users paste either the bare key
//! or a full share URL; both are accepted and reduced to the key before any
//! request URL is built.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::retry::FetchError;

/// Canonical 8-4-4-4-12 UUID, version nibble 1-5, variant nibble 8/9/a/b.
static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}",
    )
    .expect("static UUID pattern")
});

/// At most this much of a rejected input is echoed back in the error.
const INPUT_ECHO_CHARS: usize = 50;

pub const API_ID_MAX_LEN: usize = 100;

/// A validated Apifox doc key, always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the key from a bare UUID or from any string containing one
/// (e.g. `https://host/apidoc/shared/{uuid}/...`). The first match wins.
pub fn extract_key(input: &str) -> Result<ApiKey, FetchError> {
    let trimmed = input.trim();
    match UUID_RE.find(trimmed) {
        Some(m) => Ok(ApiKey(m.as_str().to_ascii_lowercase())),
        None => {
            let echoed: String = trimmed.chars().take(INPUT_ECHO_CHARS).collect();
            Err(FetchError::InvalidParams(format!(
                "invalid Apifox key or URL format: {:?} (expected a UUID or a URL like https://domain/apidoc/shared/{{UUID}})",
                echoed
            )))
        }
    }
}

/// Picks the explicit input when it is non-blank, otherwise the configured
/// default, and extracts the key from it.
pub fn resolve_key(explicit: Option<&str>, default: Option<&str>) -> Result<ApiKey, FetchError> {
    fn pick(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }
    match pick(explicit).or_else(|| pick(default)) {
        Some(raw) => extract_key(raw),
        None => Err(FetchError::InvalidParams(
            "no API key provided and APIFOX_API_KEY is not set".to_string(),
        )),
    }
}

/// Validates an API id before it is spliced into `api-{id}.md`.
pub fn validate_api_id(api_id: &str) -> Result<&str, FetchError> {
    let id = api_id.trim();
    if id.is_empty() {
        return Err(FetchError::InvalidParams("apiId must not be empty".into()));
    }
    if id.chars().count() > API_ID_MAX_LEN {
        return Err(FetchError::InvalidParams(format!(
            "apiId must be at most {} characters",
            API_ID_MAX_LEN
        )));
    }
    if id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(FetchError::InvalidParams(format!(
            "apiId contains characters not allowed in a path segment: {:?}",
            id
        )));
    }
    Ok(id)
}
