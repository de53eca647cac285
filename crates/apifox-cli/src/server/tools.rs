//! MCP tools: definitions advertised in `tools/list` and their handlers.
//!
//! Handlers run on the blocking pool (the fetch client blocks). They never
//! fail for fetch problems; those come back as `isError` text. Only a bad
//! tool name or bad arguments produce a JSON-RPC error.

use apifox_core::apifox::ApifoxClient;
use apifox_core::cancel::CancelToken;
use apifox_core::config::{
    RequestOverrides, RETRIES_DEFAULT, RETRIES_MAX, RETRIES_MIN, TIMEOUT_DEFAULT_MS,
    TIMEOUT_MAX_MS, TIMEOUT_MIN_MS,
};
use apifox_core::key::API_ID_MAX_LEN;
use apifox_core::response::{format_error, format_server_error, format_success, ApiResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::protocol::RpcError;
use super::session::Session;

pub const TOOL_LIST: &str = "apifox_get_api_list";
pub const TOOL_DETAIL: &str = "apifox_get_api_detail";
pub const TOOL_HEALTH: &str = "apifox_health_check";

pub const SERVER_NAME: &str = "apifox-api-docs-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListArgs {
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    timeout: Option<u64>,
    #[serde(default)]
    retries: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct DetailArgs {
    #[serde(default)]
    key: Option<String>,
    api_id: String,
    #[serde(default)]
    timeout: Option<u64>,
    #[serde(default)]
    retries: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HealthArgs {}

/// Text block returned to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn into_value(self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

fn budget_schema() -> (Value, Value) {
    (
        json!({
            "type": "integer",
            "minimum": TIMEOUT_MIN_MS,
            "maximum": TIMEOUT_MAX_MS,
            "description": format!(
                "Per-attempt timeout in ms ({}-{}, default {})",
                TIMEOUT_MIN_MS, TIMEOUT_MAX_MS, TIMEOUT_DEFAULT_MS
            ),
        }),
        json!({
            "type": "integer",
            "minimum": RETRIES_MIN,
            "maximum": RETRIES_MAX,
            "description": format!(
                "Retries after the first attempt ({}-{}, default {})",
                RETRIES_MIN, RETRIES_MAX, RETRIES_DEFAULT
            ),
        }),
    )
}

fn read_only_annotations() -> Value {
    json!({
        "readOnlyHint": true,
        "destructiveHint": false,
        "idempotentHint": true,
        "openWorldHint": true,
    })
}

/// Tool list for `tools/list`. Key arguments are marked optional when a
/// default key is configured.
pub fn definitions(has_default_key: bool) -> Vec<Value> {
    let (timeout, retries) = budget_schema();
    let key_note = if has_default_key {
        "(optional, defaults to the configured key)"
    } else {
        "(required: no default key configured)"
    };
    vec![
        json!({
            "name": TOOL_LIST,
            "title": "Get Apifox API list",
            "description": "Fetch the list of every API in an Apifox shared doc (llms.txt). \
                Use it first to find the apiId values accepted by apifox_get_api_detail.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": format!("Shared doc URL or UUID key {}", key_note),
                    },
                    "timeout": timeout.clone(),
                    "retries": retries.clone(),
                },
                "additionalProperties": false,
            },
            "annotations": read_only_annotations(),
        }),
        json!({
            "name": TOOL_DETAIL,
            "title": "Get Apifox API detail",
            "description": "Fetch the full Markdown document of one API (request parameters, \
                responses). Call apifox_get_api_list first and pick an apiId from it.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "key": {
                        "type": "string",
                        "description": format!("Shared doc URL or UUID key {}", key_note),
                    },
                    "apiId": {
                        "type": "string",
                        "minLength": 1,
                        "maxLength": API_ID_MAX_LEN,
                        "description": "API id as it appears in the API list",
                    },
                    "timeout": timeout,
                    "retries": retries,
                },
                "required": ["apiId"],
                "additionalProperties": false,
            },
            "annotations": read_only_annotations(),
        }),
        json!({
            "name": TOOL_HEALTH,
            "title": "Apifox MCP server health check",
            "description": "Report server version, base URL, whether a default key is \
                configured and the accepted timeout/retry ranges.",
            "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false },
            "annotations": read_only_annotations(),
        }),
    ]
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, RpcError> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args)
        .map_err(|e| RpcError::invalid_params(format!("invalid arguments for {}: {}", tool, e)))
}

/// Dispatch one `tools/call`. Blocks while fetching.
pub fn call(
    client: &ApifoxClient,
    session: &Session,
    name: &str,
    args: Value,
    cancel: &CancelToken,
) -> Result<ToolOutput, RpcError> {
    tracing::debug!(tool = name, "tool call");
    match name {
        TOOL_LIST => Ok(get_api_list(client, session, parse_args(name, args)?, cancel)),
        TOOL_DETAIL => Ok(get_api_detail(client, session, parse_args(name, args)?, cancel)),
        TOOL_HEALTH => {
            let _: HealthArgs = parse_args(name, args)?;
            Ok(health_check(client))
        }
        other => Err(RpcError::invalid_params(format!("unknown tool: {}", other))),
    }
}

fn get_api_list(
    client: &ApifoxClient,
    session: &Session,
    args: ListArgs,
    cancel: &CancelToken,
) -> ToolOutput {
    const TITLE: &str = "Fetching API list failed";
    let key = match client.resolve_key(args.input.as_deref()) {
        Ok(k) => k,
        Err(e) => {
            return ToolOutput {
                text: format_error(TITLE, &e.to_string(), &["Check the key or URL format".into()]),
                is_error: true,
            }
        }
    };
    let overrides = RequestOverrides {
        timeout_ms: args.timeout,
        retries: args.retries,
    };
    match client.list(&key, overrides, cancel) {
        ApiResult::Success { data } => {
            session.mark_listed(&key);
            ToolOutput {
                text: format_success(
                    "Fetched API doc list",
                    &data,
                    &[
                        ("Source", key.to_string()),
                        ("Length", format!("{} chars", data.chars().count())),
                    ],
                ),
                is_error: false,
            }
        }
        ApiResult::Failure { error } => ToolOutput {
            text: format_error(
                TITLE,
                &error,
                &[
                    "Check the key or URL format".into(),
                    "Check network connectivity".into(),
                ],
            ),
            is_error: true,
        },
    }
}

fn get_api_detail(
    client: &ApifoxClient,
    session: &Session,
    args: DetailArgs,
    cancel: &CancelToken,
) -> ToolOutput {
    const TITLE: &str = "Fetching API detail failed";
    let key = match client.resolve_key(args.key.as_deref()) {
        Ok(k) => k,
        Err(e) => {
            return ToolOutput {
                text: format_error(TITLE, &e.to_string(), &["Check the key or URL format".into()]),
                is_error: true,
            }
        }
    };
    let overrides = RequestOverrides {
        timeout_ms: args.timeout,
        retries: args.retries,
    };
    let api_id = args.api_id.trim();
    match client.detail(&key, api_id, overrides, cancel) {
        ApiResult::Success { data } => ToolOutput {
            text: format_success(
                "Fetched API detail",
                &data,
                &[
                    ("API ID", format!("`{}`", api_id)),
                    ("Length", format!("{} chars", data.chars().count())),
                ],
            ),
            is_error: false,
        },
        ApiResult::Failure { error } => {
            let mut suggestions = vec![
                format!("Confirm API ID `{}` exists in the doc", api_id),
                "Check the API ID spelling".to_string(),
            ];
            if !session.was_listed(&key) {
                suggestions.push(format!(
                    "Call {} first to get valid API ids for this doc",
                    TOOL_LIST
                ));
            }
            ToolOutput {
                text: format_error(TITLE, &error, &suggestions),
                is_error: true,
            }
        }
    }
}

fn health_check(client: &ApifoxClient) -> ToolOutput {
    let cfg = client.config();
    ToolOutput {
        text: format_success(
            "Apifox MCP server status",
            "",
            &[
                ("Server version", SERVER_VERSION.to_string()),
                ("Base URL", cfg.base_url.clone()),
                (
                    "Default API key configured",
                    if cfg.has_default_key() { "yes" } else { "no" }.to_string(),
                ),
                ("Available tools", "3".to_string()),
                (
                    "Timeout range",
                    format!("{}-{} ms", TIMEOUT_MIN_MS, TIMEOUT_MAX_MS),
                ),
                ("Retry range", format!("{}-{}", RETRIES_MIN, RETRIES_MAX)),
            ],
        ),
        is_error: false,
    }
}

/// Rendered when a call dies outside its handler (e.g. the blocking task panicked).
pub fn internal_failure(tool: &str, message: &str) -> ToolOutput {
    ToolOutput {
        text: format_server_error(tool, message),
        is_error: true,
    }
}

#[cfg(test)]
mod tests;
