use std::collections::BTreeMap;

use serde::Deserialize;

use super::RpcId;

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP `initialize` params.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information sent during `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

/// Parameters for `resources/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

/// Parameters for `prompts/get`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPromptParams {
    pub name: String,
    pub arguments: Option<BTreeMap<String, String>>,
}

/// Arguments for the `list_containers` tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListContainersParams {
    /// Include stopped containers.
    #[serde(default)]
    pub all: bool,
}

/// Arguments for tools that target a single container.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerParams {
    pub container_id: String,
}

/// Arguments for the `remove_container` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveContainerParams {
    pub container_id: String,
    #[serde(default)]
    pub force: bool,
}

/// Arguments for the `fetch_logs` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchLogsParams {
    pub container_id: String,
    pub tail: Option<u64>,
}

/// Arguments for the `pull_image` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct PullImageParams {
    pub image: String,
}

/// Arguments for the `run_container` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct RunContainerParams {
    pub image: String,
    pub command: Option<String>,
    #[serde(default = "default_detach")]
    pub detach: bool,
    pub env_vars: Option<BTreeMap<String, String>>,
    pub ports: Option<Vec<String>>,
    pub volumes: Option<Vec<String>>,
    pub name: Option<String>,
}

fn default_detach() -> bool {
    true
}
