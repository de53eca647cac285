use super::*;
use apifox_core::config::AppConfig;
use apifox_core::fetch::{FetchClient, HttpResponse, HttpTransport};
use apifox_core::retry::FetchError;
use std::sync::Arc;
use std::time::Duration;

const KEY: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Serves `llms.txt` and `api-1.md`; everything else is 404.
struct DocsTransport;

impl HttpTransport for DocsTransport {
    fn get(
        &self,
        url: &str,
        _timeout: Duration,
        _cancel: &CancelToken,
    ) -> Result<HttpResponse, FetchError> {
        let (status, body) = if url.ends_with("/llms.txt") {
            (200, "- [Create pet](api-1.md)")
        } else if url.ends_with("/api-1.md") {
            (200, "# Create pet\nPOST /pets")
        } else {
            (404, "")
        };
        Ok(HttpResponse {
            status,
            reason: if status == 404 { "Not Found" } else { "OK" }.to_string(),
            body: body.to_string(),
        })
    }
}

fn client(api_key: Option<&str>) -> ApifoxClient {
    let cfg = AppConfig {
        api_key: api_key.map(str::to_string),
        ..AppConfig::default()
    };
    ApifoxClient::new(cfg, FetchClient::new(Arc::new(DocsTransport)))
}

fn run(client: &ApifoxClient, session: &Session, name: &str, args: Value) -> Result<ToolOutput, RpcError> {
    call(client, session, name, args, &CancelToken::new())
}

#[test]
fn definitions_advertise_three_tools() {
    let defs = definitions(true);
    let names: Vec<&str> = defs.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(names, [TOOL_LIST, TOOL_DETAIL, TOOL_HEALTH]);
    assert_eq!(defs[1]["inputSchema"]["required"], json!(["apiId"]));
    assert_eq!(defs[0]["inputSchema"]["properties"]["timeout"]["maximum"], TIMEOUT_MAX_MS);
}

#[test]
fn list_renders_data_and_source() {
    let c = client(Some(KEY));
    let session = Session::new();
    let out = run(&c, &session, TOOL_LIST, json!({})).unwrap();
    assert!(!out.is_error);
    assert!(out.text.starts_with("✅ Fetched API doc list"));
    assert!(out.text.contains(&format!("**Source**: {}", KEY)));
    assert!(out.text.ends_with("- [Create pet](api-1.md)"));
}

#[test]
fn detail_after_list_has_no_list_hint() {
    let c = client(Some(KEY));
    let session = Session::new();
    run(&c, &session, TOOL_LIST, json!({})).unwrap();

    let ok = run(&c, &session, TOOL_DETAIL, json!({"apiId": "1"})).unwrap();
    assert!(!ok.is_error);
    assert!(ok.text.contains("POST /pets"));

    let missing = run(&c, &session, TOOL_DETAIL, json!({"apiId": "2"})).unwrap();
    assert!(missing.is_error);
    assert!(missing.text.contains("404"));
    assert!(!missing.text.contains(TOOL_LIST));
}

#[test]
fn detail_without_list_suggests_listing_first() {
    let c = client(None);
    let session = Session::new();
    let out = run(&c, &session, TOOL_DETAIL, json!({"key": KEY, "apiId": "99"})).unwrap();
    assert!(out.is_error);
    assert!(out.text.contains(&format!("Call {} first", TOOL_LIST)));
}

#[test]
fn missing_key_is_tool_error_not_rpc_error() {
    let c = client(None);
    let out = run(&c, &Session::new(), TOOL_LIST, json!({})).unwrap();
    assert!(out.is_error);
    assert!(out.text.contains("APIFOX_API_KEY"));
}

#[test]
fn unknown_fields_and_tools_are_invalid_params() {
    let c = client(Some(KEY));
    let session = Session::new();
    let err = run(&c, &session, TOOL_LIST, json!({"bogus": 1})).unwrap_err();
    assert_eq!(err.code, crate::server::protocol::INVALID_PARAMS);

    let err = run(&c, &session, TOOL_DETAIL, json!({})).unwrap_err();
    assert!(err.message.contains("apiId"));

    let err = run(&c, &session, "apifox_delete_everything", json!({})).unwrap_err();
    assert!(err.message.contains("unknown tool"));
}

#[test]
fn health_reports_configuration() {
    let c = client(None);
    let out = run(&c, &Session::new(), TOOL_HEALTH, Value::Null).unwrap();
    assert!(!out.is_error);
    assert!(out.text.contains("**Default API key configured**: no"));
    assert!(out.text.contains(&format!("**Server version**: {}", SERVER_VERSION)));
    assert!(out.text.contains("1000-60000 ms"));
}

#[test]
fn output_serializes_as_text_content() {
    let v = ToolOutput {
        text: "hi".into(),
        is_error: true,
    }
    .into_value();
    assert_eq!(v, json!({"content": [{"type": "text", "text": "hi"}], "isError": true}));
}
