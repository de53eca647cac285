//! MCP server over stdio: one JSON-RPC message per line in, one per line out.
//!
//! The read loop never blocks on a tool call. Each `tools/call` registers a
//! cancel token under its request id, then runs on the blocking pool and
//! sends its response through the writer channel when done, so
//! `notifications/cancelled` can reach a call that is still fetching.

mod protocol;
mod session;
mod tools;

use anyhow::{Context, Result};
use apifox_core::apifox::ApifoxClient;
use apifox_core::cancel::CancelRegistry;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use protocol::{error_response, parse_line, request_key, result_response, RpcError};
use session::Session;

/// State shared by every request on one connection.
#[derive(Clone)]
pub struct McpServer {
    client: Arc<ApifoxClient>,
    session: Arc<Session>,
    cancels: Arc<CancelRegistry>,
}

impl McpServer {
    pub fn new(client: ApifoxClient) -> Self {
        Self {
            client: Arc::new(client),
            session: Arc::new(Session::new()),
            cancels: Arc::new(CancelRegistry::new()),
        }
    }

    /// Handle one input line. Responses go to `out`, either right away or,
    /// for tool calls, from a spawned task. Must run inside a tokio runtime.
    pub fn handle_line(&self, line: &str, out: &mpsc::UnboundedSender<Value>) {
        let msg = match parse_line(line) {
            Ok(msg) => msg,
            Err(resp) => {
                tracing::warn!("unparseable message");
                let _ = out.send(resp);
                return;
            }
        };
        let Some(method) = msg.method else {
            // A response to a request we never sent.
            return;
        };
        let params = msg.params.unwrap_or(Value::Null);

        let Some(id) = msg.id else {
            self.handle_notification(&method, &params);
            return;
        };

        let reply = match method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": protocol::PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": { "name": tools::SERVER_NAME, "version": tools::SERVER_VERSION },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({
                "tools": tools::definitions(self.client.config().has_default_key()),
            })),
            "tools/call" => {
                self.spawn_tool_call(id, params, out.clone());
                return;
            }
            other => Err(RpcError::method_not_found(other)),
        };
        let resp = match reply {
            Ok(result) => result_response(id, result),
            Err(e) => error_response(id, &e),
        };
        let _ = out.send(resp);
    }

    fn handle_notification(&self, method: &str, params: &Value) {
        match method {
            "notifications/initialized" => tracing::info!("client initialized"),
            "notifications/cancelled" => {
                let Some(request_id) = params.get("requestId") else {
                    tracing::debug!("cancel notification without requestId");
                    return;
                };
                let key = request_key(request_id);
                let found = self.cancels.request_cancel(&key);
                tracing::info!(request_id = %key, found, "cancel requested");
            }
            other => tracing::debug!(method = other, "ignoring notification"),
        }
    }

    fn spawn_tool_call(&self, id: Value, params: Value, out: mpsc::UnboundedSender<Value>) {
        let Some(name) = params.get("name").and_then(Value::as_str).map(str::to_string) else {
            let _ = out.send(error_response(
                id,
                &RpcError::invalid_params("tools/call requires a tool name"),
            ));
            return;
        };
        let args = params.get("arguments").cloned().unwrap_or(Value::Null);

        let key = request_key(&id);
        // Registered before spawning so a cancel right behind the call finds it.
        let Some(cancel) = self.cancels.register(&key) else {
            tracing::warn!(request_id = %key, "duplicate id for an in-flight call");
            let _ = out.send(error_response(
                id,
                &RpcError::invalid_request(format!("request id {} is already in flight", key)),
            ));
            return;
        };
        let server = self.clone();

        tokio::spawn(async move {
            let joined = tokio::task::spawn_blocking({
                let server = server.clone();
                let name = name.clone();
                let cancel = cancel.clone();
                move || tools::call(&server.client, &server.session, &name, args, &cancel)
            })
            .await;
            server.cancels.unregister(&key);

            if cancel.is_cancelled() {
                tracing::info!(tool = %name, request_id = %key, "call cancelled, no response sent");
                return;
            }
            let resp = match joined {
                Ok(Ok(output)) => result_response(id, output.into_value()),
                Ok(Err(e)) => error_response(id, &e),
                Err(e) => {
                    tracing::error!(tool = %name, error = %e, "tool task failed");
                    result_response(id, tools::internal_failure(&name, &e.to_string()).into_value())
                }
            };
            let _ = out.send(resp);
        });
    }
}

/// Serve MCP on stdin/stdout until stdin closes or Ctrl-C.
///
/// On EOF in-flight calls still finish and answer; on Ctrl-C they are cancelled.
pub async fn serve_stdio(client: ApifoxClient) -> Result<()> {
    let server = McpServer::new(client);
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(msg) = rx.recv().await {
            let mut line = msg.to_string();
            line.push('\n');
            if let Err(e) = stdout.write_all(line.as_bytes()).await {
                tracing::warn!("stdout write failed: {}", e);
                break;
            }
            if let Err(e) = stdout.flush().await {
                tracing::warn!("stdout flush failed: {}", e);
                break;
            }
        }
    });

    tracing::info!("mcp server listening on stdio");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let read_result = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !line.trim().is_empty() {
                        server.handle_line(&line, &tx);
                    }
                }
                Ok(None) => {
                    tracing::info!("stdin closed");
                    break Ok(());
                }
                Err(e) => {
                    server.cancels.cancel_all();
                    break Err(e).context("read stdin");
                }
            },
            _ = &mut shutdown => {
                tracing::info!(in_flight = server.cancels.in_flight(), "interrupted, cancelling calls");
                server.cancels.cancel_all();
                break Ok(());
            }
        }
    };

    // The writer ends once every in-flight call has dropped its sender.
    drop(tx);
    writer.await.context("stdout writer task")?;
    read_result
}
