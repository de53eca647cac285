//! Result envelope and text rendering for tool callers.
//!
//! Everything the fetch client produces ends up as an [`ApiResult`]; this
//! boundary never returns an error, so tool handlers can render without
//! their own error plumbing.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::retry::FetchError;

/// `{ "success": true, "data": ... }` or `{ "success": false, "error": ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult {
    Success { data: String },
    Failure { error: String },
}

impl ApiResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success { .. })
    }
}

impl From<Result<String, FetchError>> for ApiResult {
    fn from(result: Result<String, FetchError>) -> Self {
        match result {
            Ok(data) => ApiResult::Success { data },
            Err(e) => e.into(),
        }
    }
}

impl From<FetchError> for ApiResult {
    fn from(e: FetchError) -> Self {
        ApiResult::Failure {
            error: e.to_string(),
        }
    }
}

impl Serialize for ApiResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ApiResult", 2)?;
        match self {
            ApiResult::Success { data } => {
                s.serialize_field("success", &true)?;
                s.serialize_field("data", data)?;
            }
            ApiResult::Failure { error } => {
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
            }
        }
        s.end()
    }
}

/// `✅ {title}` followed by `**key**: value` lines and, when `data` is
/// non-blank, a `---` separator and the data itself.
pub fn format_success(title: &str, data: &str, metadata: &[(&str, String)]) -> String {
    let meta = metadata
        .iter()
        .map(|(k, v)| format!("**{}**: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n");
    let mut out = format!("✅ {}\n\n{}", title, meta);
    if !data.trim().is_empty() {
        out.push_str("\n\n---\n\n");
        out.push_str(data);
    }
    out
}

pub fn format_error(title: &str, message: &str, suggestions: &[String]) -> String {
    let mut out = format!("❌ {}\n\n**Error**: {}", title, message);
    if !suggestions.is_empty() {
        out.push_str("\n\n**Suggestions**:");
        for s in suggestions {
            out.push_str("\n- ");
            out.push_str(s);
        }
    }
    out
}

/// For failures outside the fetch client (bad arguments, internal errors).
pub fn format_server_error(tool: &str, message: &str) -> String {
    format!(
        "❌ Server error\n\n**Tool**: {}\n**Error**: {}\n\nCheck the input parameters or try again later.",
        tool, message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_with_data_only() {
        let r = ApiResult::from(Ok::<_, FetchError>("{\"ok\":true}".to_string()));
        assert!(r.is_success());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, serde_json::json!({"success": true, "data": "{\"ok\":true}"}));
    }

    #[test]
    fn failure_serializes_with_error_only() {
        let r = ApiResult::from(Err::<String, _>(FetchError::EmptyResponse));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], false);
        assert!(v["error"].as_str().unwrap().contains("empty"));
        assert!(v.get("data").is_none());
    }

    #[test]
    fn http_failures_mention_status() {
        let r = ApiResult::from(FetchError::ClientError {
            status: 404,
            reason: "Not Found".into(),
        });
        match r {
            ApiResult::Failure { error } => assert!(error.contains("404")),
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn success_text_omits_blank_data() {
        let text = format_success("Status", "  ", &[("Version", "0.1.0".into())]);
        assert_eq!(text, "✅ Status\n\n**Version**: 0.1.0");

        let text = format_success("Got list", "# APIs", &[("Length", "6 chars".into())]);
        assert!(text.ends_with("\n\n---\n\n# APIs"));
    }

    #[test]
    fn error_text_lists_suggestions() {
        let text = format_error(
            "Fetching API list failed",
            "HTTP 404: client error",
            &["Check the key".to_string(), "Check the network".to_string()],
        );
        assert!(text.starts_with("❌ Fetching API list failed"));
        assert!(text.contains("**Error**: HTTP 404: client error"));
        assert!(text.ends_with("- Check the key\n- Check the network"));
    }
}
