//! Line-delimited JSON-RPC 2.0 framing for the tool surface, as spoken by
//! stdio tool clients (`initialize`, `tools/list`, `tools/call`).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{call_tool, tool_catalog};
use crate::leave::{LeaveStorage, LeaveStore};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "leave-desk";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    /// `None` only when the member is absent; an explicit `null` id is kept.
    #[serde(default, deserialize_with = "deserialize_present_id")]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

fn deserialize_present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

impl RpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcErrorBody {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Handle one inbound line. Notifications (no `id`) produce no response.
pub fn handle_line<S>(store: &LeaveStore<S>, line: &str) -> Option<RpcResponse>
where
    S: LeaveStorage + 'static,
{
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "unparseable rpc message");
            return Some(RpcResponse::failure(Value::Null, PARSE_ERROR, err.to_string()));
        }
    };

    let request: RpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => {
            return Some(RpcResponse::failure(
                Value::Null,
                INVALID_REQUEST,
                err.to_string(),
            ))
        }
    };

    let Some(id) = request.id else {
        debug!(method = %request.method, "ignoring notification");
        return None;
    };

    let response = match request.method.as_str() {
        "initialize" => RpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": { "tools": {} },
            }),
        ),
        "ping" => RpcResponse::success(id, json!({})),
        "tools/list" => RpcResponse::success(id, json!({ "tools": tool_catalog() })),
        "tools/call" => handle_tool_call(store, id, request.params),
        other => RpcResponse::failure(id, METHOD_NOT_FOUND, format!("method '{other}' not found")),
    };
    Some(response)
}

fn handle_tool_call<S>(store: &LeaveStore<S>, id: Value, params: Value) -> RpcResponse
where
    S: LeaveStorage + 'static,
{
    let params: ToolCallParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(err) => return RpcResponse::failure(id, INVALID_PARAMS, err.to_string()),
    };

    match call_tool(store, &params.name, params.arguments) {
        Ok(envelope) => RpcResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": envelope.to_string() }],
                "structuredContent": envelope,
                "isError": false,
            }),
        ),
        Err(err) => RpcResponse::failure(id, INVALID_PARAMS, err.to_string()),
    }
}
