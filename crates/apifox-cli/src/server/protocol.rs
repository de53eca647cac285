//! JSON-RPC 2.0 framing for the MCP stdio transport (one message per line).

use serde::Deserialize;
use serde_json::{json, Value};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Any client message: request (has `id` and `method`), notification
/// (`method` only) or a response to something we never send (`id` only).
#[derive(Debug, Deserialize)]
pub struct Incoming {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_REQUEST,
            message: message.into(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: format!("method not found: {}", method),
        }
    }
}

/// Parse one line. `Err` carries a ready-to-send error response.
pub fn parse_line(line: &str) -> Result<Incoming, Value> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        error_response(
            Value::Null,
            &RpcError {
                code: PARSE_ERROR,
                message: format!("parse error: {}", e),
            },
        )
    })?;
    serde_json::from_value(value).map_err(|e| {
        error_response(
            Value::Null,
            &RpcError {
                code: INVALID_REQUEST,
                message: format!("invalid request: {}", e),
            },
        )
    })
}

pub fn result_response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub fn error_response(id: Value, err: &RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": err.code, "message": err.message },
    })
}

/// Key for the cancel registry; `1` and `"1"` stay distinct.
pub fn request_key(id: &Value) -> String {
    id.to_string()
}
