use crate::engine::{ContainerEngine, EngineError};
use crate::protocol::ContainerParams;

/// Handle an `inspect_container` tool call.
///
/// Returns the engine's inspect document unchanged, pretty-printed.
pub async fn handle(
    params: ContainerParams,
    engine: &dyn ContainerEngine,
) -> Result<String, EngineError> {
    inspect_pretty(&params.container_id, engine).await
}

/// Also backs the `docker://container/{id}` resource.
pub async fn inspect_pretty(id: &str, engine: &dyn ContainerEngine) -> Result<String, EngineError> {
    let attrs = engine.inspect_container(id).await?;
    serde_json::to_string_pretty(&attrs)
        .map_err(|e| EngineError::engine(format!("Cannot encode inspect document: {e}")))
}
