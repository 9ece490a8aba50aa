pub mod fetch_logs;
pub mod inspect_container;
pub mod lifecycle;
pub mod list_containers;
pub mod list_images;
pub mod prompts;
pub mod pull_image;
pub mod resources;
pub mod run_container;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::engine::ContainerEngine;
use crate::protocol::{
    GetPromptParams, InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ReadResourceParams, ResourceResult, ToolCallParams, ToolResult,
};
use crate::schema;

/// MCP protocol revision implemented by this server.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(
    req: &JsonRpcRequest,
    engine: &dyn ContainerEngine,
) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            if let Some(params) = req
                .params
                .clone()
                .and_then(|v| serde_json::from_value::<InitializeParams>(v).ok())
            {
                let client = params.client_info.as_ref();
                info!(
                    client = client.and_then(|c| c.name.as_deref()).unwrap_or("unknown"),
                    client_version = client.and_then(|c| c.version.as_deref()).unwrap_or("unknown"),
                    protocol = params.protocol_version.as_deref().unwrap_or("unspecified"),
                    "Client initializing"
                );
            }
            let result = serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": "mcp-docker-server",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({ "tools": schema::tool_definitions() });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match request_params(req, "tools/call") {
                Ok(p) => p,
                Err(err) => return Some(JsonRpcResponse::error(req.id.clone(), err)),
            };

            let tool_result = dispatch_tool_call(&params, engine).await;
            Some(JsonRpcResponse::from_result(req.id.clone(), &tool_result))
        }

        "resources/list" => Some(JsonRpcResponse::success(req.id.clone(), resources::list())),

        "resources/templates/list" => {
            Some(JsonRpcResponse::success(req.id.clone(), resources::templates()))
        }

        "resources/read" => {
            let params: ReadResourceParams = match request_params(req, "resources/read") {
                Ok(p) => p,
                Err(err) => return Some(JsonRpcResponse::error(req.id.clone(), err)),
            };

            let Some(resource) = resources::Resource::parse(&params.uri) else {
                return Some(JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::invalid_params(format!("Unknown resource: {}", params.uri)),
                ));
            };

            let outcome = resources::read(resource, engine).await;
            if let Err(e) = &outcome {
                warn!(uri = %params.uri, "Resource read failed: {e}");
            }
            let result = ResourceResult::from_outcome(&params.uri, outcome);
            Some(JsonRpcResponse::from_result(req.id.clone(), &result))
        }

        "prompts/list" => Some(JsonRpcResponse::success(req.id.clone(), prompts::list())),

        "prompts/get" => {
            let params: GetPromptParams = match request_params(req, "prompts/get") {
                Ok(p) => p,
                Err(err) => return Some(JsonRpcResponse::error(req.id.clone(), err)),
            };

            match prompts::get(&params.name) {
                Some(prompt) => Some(JsonRpcResponse::from_result(req.id.clone(), &prompt)),
                None => Some(JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::invalid_params(format!("Unknown prompt: {}", params.name)),
                )),
            }
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

fn request_params<T: DeserializeOwned>(
    req: &JsonRpcRequest,
    method: &str,
) -> Result<T, JsonRpcError> {
    match &req.params {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            JsonRpcError::invalid_params(format!("Invalid {method} params: {e}"))
        }),
        None => Err(JsonRpcError::invalid_params(format!(
            "Missing params for {method}"
        ))),
    }
}

/// Validate and decode tool arguments.
///
/// Missing arguments are treated as an empty object so that tools without
/// required fields can be called bare.
fn tool_arguments<T: DeserializeOwned>(params: &ToolCallParams) -> Result<T, ToolResult> {
    let arguments = params
        .arguments
        .clone()
        .unwrap_or_else(|| serde_json::json!({}));

    let invalid = |detail: String| {
        ToolResult::error(format!("Invalid arguments for {}: {detail}", params.name))
    };

    schema::validate_arguments(&params.name, &arguments).map_err(|e| invalid(e.to_string()))?;
    serde_json::from_value(arguments).map_err(|e| invalid(e.to_string()))
}

async fn dispatch_tool_call(params: &ToolCallParams, engine: &dyn ContainerEngine) -> ToolResult {
    debug!(tool = %params.name, "Tool call");

    let result: ToolResult = match params.name.as_str() {
        "list_containers" => match tool_arguments(params) {
            Ok(args) => list_containers::handle(args, engine).await.into(),
            Err(invalid) => invalid,
        },

        "list_images" => match tool_arguments::<serde_json::Value>(params) {
            Ok(_) => list_images::handle(engine).await.into(),
            Err(invalid) => invalid,
        },

        "inspect_container" => match tool_arguments(params) {
            Ok(args) => inspect_container::handle(args, engine).await.into(),
            Err(invalid) => invalid,
        },

        "run_container" => match tool_arguments(params) {
            Ok(args) => match run_container::run_spec(args) {
                Ok(spec) => run_container::handle(&spec, engine).await.into(),
                Err(detail) => {
                    ToolResult::error(format!("Invalid arguments for run_container: {detail}"))
                }
            },
            Err(invalid) => invalid,
        },

        "stop_container" => match tool_arguments(params) {
            Ok(args) => lifecycle::stop(args, engine).await.into(),
            Err(invalid) => invalid,
        },

        "remove_container" => match tool_arguments(params) {
            Ok(args) => lifecycle::remove(args, engine).await.into(),
            Err(invalid) => invalid,
        },

        "fetch_logs" => match tool_arguments(params) {
            Ok(args) => fetch_logs::handle(args, engine).await.into(),
            Err(invalid) => invalid,
        },

        "pull_image" => match tool_arguments(params) {
            Ok(args) => pull_image::handle(args, engine).await.into(),
            Err(invalid) => invalid,
        },

        _ => ToolResult::error(format!("Unknown tool: {}", params.name)),
    };

    if result.is_error {
        warn!(tool = %params.name, "{}", result.first_text());
    }
    result
}
