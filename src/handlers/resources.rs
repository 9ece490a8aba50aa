//! Read-only `docker://` resources.

use serde::Serialize;
use serde_json::{json, Value};

use super::inspect_container::inspect_pretty;
use crate::engine::{ContainerEngine, EngineError};

pub const CONTAINERS_URI: &str = "docker://containers";
pub const IMAGES_URI: &str = "docker://images";
pub const CONTAINER_URI_PREFIX: &str = "docker://container/";

/// A parsed resource URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<'a> {
    Containers,
    Images,
    Container(&'a str),
}

impl<'a> Resource<'a> {
    pub fn parse(uri: &'a str) -> Option<Self> {
        match uri {
            CONTAINERS_URI => Some(Self::Containers),
            IMAGES_URI => Some(Self::Images),
            _ => uri
                .strip_prefix(CONTAINER_URI_PREFIX)
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(Self::Container),
        }
    }
}

pub fn list() -> Value {
    json!({
        "resources": [
            {
                "uri": CONTAINERS_URI,
                "name": "containers",
                "description": "All containers, running or not",
                "mimeType": "application/json"
            },
            {
                "uri": IMAGES_URI,
                "name": "images",
                "description": "All locally available images",
                "mimeType": "application/json"
            }
        ]
    })
}

pub fn templates() -> Value {
    json!({
        "resourceTemplates": [
            {
                "uriTemplate": format!("{CONTAINER_URI_PREFIX}{{container_id}}"),
                "name": "container",
                "description": "Inspect document of a single container",
                "mimeType": "application/json"
            }
        ]
    })
}

/// Read a resource body as pretty JSON.
pub async fn read(resource: Resource<'_>, engine: &dyn ContainerEngine) -> Result<String, EngineError> {
    match resource {
        Resource::Containers => to_pretty(&engine.list_containers(true).await?),
        Resource::Images => to_pretty(&engine.list_images().await?),
        Resource::Container(id) => inspect_pretty(id, engine).await,
    }
}

fn to_pretty<T: Serialize>(value: &T) -> Result<String, EngineError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| EngineError::engine(format!("Cannot encode resource: {e}")))
}
