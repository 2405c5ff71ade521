//! # MCP Protocol Handler
//!
//! Routes JSON-RPC messages to MCP methods. Transport independent: both the
//! stdio loop and the HTTP endpoint hand raw messages to `handle_message`.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
use super::registry::{self, ToolDef};
use crate::constants::{SERVER_NAME, SUPPORTED_PROTOCOL_VERSIONS};
use crate::error::VaultError;
use crate::operations::VaultService;

/// Build a version string that includes the git SHA: `0.1.0+abc1234`.
pub const fn version_string() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"))
}

#[derive(Debug)]
pub struct McpServer {
    service: Arc<VaultService>,
    tools: Vec<ToolDef>,
}

impl McpServer {
    pub fn new(service: Arc<VaultService>) -> Self {
        Self {
            service,
            tools: registry::tool_defs(),
        }
    }

    /// Handle one raw JSON-RPC message. `None` means no response is due
    /// (notifications).
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("invalid JSON-RPC: {e}");
                return Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned().filter(|id| !id.is_null());
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("invalid request: {e}"),
                ));
            }
        };

        self.handle(request).await
    }

    /// Handle one parsed request
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            warn!("invalid jsonrpc version: {}", request.jsonrpc);
        }

        if request.is_notification() {
            debug!(method = %request.method, "received notification");
            return None;
        }

        let id = request.id;
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::ok(id, initialize_result(&request.params)),
            "ping" => JsonRpcResponse::ok(id, json!({})),
            "tools/list" => {
                let tools: Vec<Value> = self.tools.iter().map(ToolDef::to_json).collect();
                JsonRpcResponse::ok(id, json!({ "tools": tools }))
            }
            "tools/call" => self.handle_tools_call(id, request.params).await,
            method => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("method not found: {method}"),
            ),
        };
        Some(response)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "missing 'name' in tools/call");
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        match registry::dispatch(&self.service, name, arguments).await {
            None => JsonRpcResponse::error(id, INVALID_PARAMS, format!("unknown tool: {name}")),
            Some(Ok(output)) => JsonRpcResponse::ok(id, tool_success(output)),
            Some(Err(e)) => JsonRpcResponse::ok(id, tool_failure(&e)),
        }
    }
}

/// Echo the client's protocol version when supported, otherwise offer the latest
fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|requested| {
            SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .find(|supported| **supported == requested)
                .copied()
        })
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}

fn initialize_result(params: &Value) -> Value {
    let requested = params.get("protocolVersion").and_then(Value::as_str);
    json!({
        "protocolVersion": negotiate_protocol_version(requested),
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": version_string()
        }
    })
}

fn tool_success(output: Value) -> Value {
    let text = serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": output,
        "isError": false
    })
}

fn tool_failure(error: &VaultError) -> Value {
    json!({
        "content": [{ "type": "text", "text": error.to_string() }],
        "isError": true
    })
}
