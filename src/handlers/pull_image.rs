use tracing::info;

use crate::engine::{ContainerEngine, EngineError};
use crate::protocol::PullImageParams;
use crate::reference::short_image_id;

/// Handle a `pull_image` tool call.
///
/// A reference without a tag pulls `latest`.
pub async fn handle(
    params: PullImageParams,
    engine: &dyn ContainerEngine,
) -> Result<String, EngineError> {
    let id = engine.pull_image(&params.image).await?;
    info!(image = %params.image, id = %id, "Image pulled");
    Ok(format!(
        "Successfully pulled image: {} (ID: {})",
        params.image,
        short_image_id(&id)
    ))
}
