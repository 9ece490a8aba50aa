use crate::engine::{ContainerEngine, EngineError};
use crate::protocol::FetchLogsParams;

const NO_LOGS: &str = "No logs available";

/// Handle a `fetch_logs` tool call.
pub async fn handle(
    params: FetchLogsParams,
    engine: &dyn ContainerEngine,
) -> Result<String, EngineError> {
    let logs = engine
        .container_logs(&params.container_id, params.tail)
        .await?;

    if logs.is_empty() {
        Ok(NO_LOGS.to_string())
    } else {
        Ok(logs)
    }
}
