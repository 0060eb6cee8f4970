//! JSON-RPC messages and the MCP method table used by the SSE transport.
//!
//! `process_request` answers one decoded message against an `McpServer`.
//! Notifications produce no response.

use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::core::McpServer;

/// Protocol revision spoken by the SSE transport.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Revisions a client may request and get echoed back.
const SUPPORTED_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

/// MCP error code for an unknown resource.
const RESOURCE_NOT_FOUND: i32 = -32002;

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a request with an id.
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Create a notification.
    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    /// Whether this is a `tools/call` expecting a reply.
    pub fn is_tool_call(&self) -> bool {
        self.id.is_some() && self.method == "tools/call"
    }
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Serialize `result` into a success response.
    pub fn from_result<T: Serialize>(id: Option<Value>, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => Self::internal_error(id, e.to_string()),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, -32601, format!("Method not found: {}", method))
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Handshake state of one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Set by `notifications/initialized`.
    pub initialized: bool,
    /// Agreed during `initialize`.
    pub protocol_version: Option<String>,
}

/// Answer one message. Returns `None` for notifications.
pub async fn process_request(
    server: &McpServer,
    session: &mut SessionState,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    if request.id.is_none() {
        handle_notification(session, &request);
        return None;
    }

    if !session.initialized && request.method != "initialize" && request.method != "ping" {
        debug!("{} received before the session was initialized", request.method);
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(server, session, request),
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request).await,
        "resources/list" => handle_resources_list(server, request),
        "resources/read" => handle_resources_read(server, request),
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id, &request.method)
        }
    };
    Some(response)
}

fn handle_initialize(
    server: &McpServer,
    session: &mut SessionState,
    request: JsonRpcRequest,
) -> JsonRpcResponse {
    let requested = request
        .params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str);
    let version = requested
        .filter(|v| SUPPORTED_VERSIONS.contains(v))
        .unwrap_or(PROTOCOL_VERSION)
        .to_string();
    info!("Initializing session (protocol {})", version);

    session.protocol_version = Some(version.clone());

    let capabilities = match serde_json::to_value(server.capabilities()) {
        Ok(value) => value,
        Err(e) => return JsonRpcResponse::internal_error(request.id, e.to_string()),
    };

    JsonRpcResponse::success(
        request.id,
        json!({
            "protocolVersion": version,
            "capabilities": capabilities,
            "serverInfo": {
                "name": server.name(),
                "version": server.version()
            },
            "instructions": server.config().server.instructions
        }),
    )
}

fn handle_notification(session: &mut SessionState, request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => {
            info!("Client sent initialized notification");
            session.initialized = true;
        }
        method if method.starts_with("notifications/") => {
            debug!("Received notification: {}", method);
        }
        method => warn!("Ignoring {} sent without an id", method),
    }
}

fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");
    JsonRpcResponse::success(request.id, json!({ "tools": server.tools() }))
}

/// Handle `tools/call`. Tool failures come back inside the result.
pub async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let (name, arguments) = match tool_call_params(request.params.as_ref()) {
        Ok(parsed) => parsed,
        Err(msg) => return JsonRpcResponse::invalid_params(request.id, msg),
    };

    let result = server.execute_tool(&name, arguments).await;
    JsonRpcResponse::from_result(request.id, &result)
}

/// Extract the tool name and arguments from `tools/call` params.
pub(crate) fn tool_call_params(
    params: Option<&Value>,
) -> Result<(String, Option<JsonObject>), &'static str> {
    let params = params.ok_or("Missing params")?;
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or("Missing tool name")?;

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => return Err("Tool arguments must be an object"),
    };

    Ok((name.to_string(), arguments))
}

fn handle_resources_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/list request");
    JsonRpcResponse::success(request.id, json!({ "resources": server.resources() }))
}

fn handle_resources_read(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let uri = match request
        .params
        .as_ref()
        .and_then(|p| p.get("uri"))
        .and_then(Value::as_str)
    {
        Some(uri) => uri.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing resource URI"),
    };
    info!("Reading resource: {}", uri);

    match server.resource(&uri) {
        Ok(result) => JsonRpcResponse::from_result(request.id, &result),
        Err(e) => JsonRpcResponse::error(request.id, RESOURCE_NOT_FOUND, e.to_string()),
    }
}
