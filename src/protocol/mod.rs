pub mod request;
pub mod response;

use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request ID: a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    Str(String),
}

pub use request::{
    ContainerParams, FetchLogsParams, GetPromptParams, InitializeParams, JsonRpcRequest,
    ListContainersParams, PullImageParams, ReadResourceParams, RemoveContainerParams,
    RunContainerParams, ToolCallParams,
};
pub use response::{
    JsonRpcError, JsonRpcResponse, PromptMessage, PromptResult, ResourceContents,
    ResourceResult, TextContent, ToolResult,
};
