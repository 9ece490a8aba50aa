use tracing::info;

use crate::engine::{ContainerEngine, EngineError};
use crate::protocol::{ContainerParams, RemoveContainerParams};

/// Handle a `stop_container` tool call.
pub async fn stop(
    params: ContainerParams,
    engine: &dyn ContainerEngine,
) -> Result<String, EngineError> {
    engine.stop_container(&params.container_id).await?;
    info!(container = %params.container_id, "Container stopped");
    Ok(format!("Container {} stopped", params.container_id))
}

/// Handle a `remove_container` tool call.
pub async fn remove(
    params: RemoveContainerParams,
    engine: &dyn ContainerEngine,
) -> Result<String, EngineError> {
    engine
        .remove_container(&params.container_id, params.force)
        .await?;
    info!(container = %params.container_id, force = params.force, "Container removed");
    Ok(format!("Container {} removed", params.container_id))
}
