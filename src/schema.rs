//! Tool definitions advertised by `tools/list` and the argument validation
//! that `tools/call` performs against them.

use jsonschema::validator_for;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("{}", .0.join("; "))]
    ValidationFailed(Vec<String>),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// A tool as listed by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn container_id_property() -> Value {
    json!({
        "type": "string",
        "description": "ID or name of the container"
    })
}

/// All tools, in the order they are advertised.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "list_containers",
            description: "List Docker containers (running only unless `all` is set)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "all": {
                        "type": "boolean",
                        "description": "Show all containers, not just running ones",
                        "default": false
                    }
                }
            }),
        },
        ToolDefinition {
            name: "list_images",
            description: "List locally available Docker images",
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: "inspect_container",
            description: "Return the full inspect document of a container as JSON",
            input_schema: json!({
                "type": "object",
                "required": ["container_id"],
                "properties": { "container_id": container_id_property() }
            }),
        },
        ToolDefinition {
            name: "run_container",
            description: "Create and start a container from an image",
            input_schema: json!({
                "type": "object",
                "required": ["image"],
                "properties": {
                    "image": {
                        "type": "string",
                        "description": "Image to run, e.g. \"ubuntu:latest\""
                    },
                    "command": {
                        "type": ["string", "null"],
                        "description": "Command to run in the container"
                    },
                    "detach": {
                        "type": "boolean",
                        "description": "Run in the background and return the container ID",
                        "default": true
                    },
                    "env_vars": {
                        "type": ["object", "null"],
                        "description": "Environment variables as name/value pairs",
                        "additionalProperties": { "type": "string" }
                    },
                    "ports": {
                        "type": ["array", "null"],
                        "description": "Port mappings: \"8080:80\", \"53:53/udp\", \"80\" or \"80/tcp\"",
                        "items": { "type": "string" }
                    },
                    "volumes": {
                        "type": ["array", "null"],
                        "description": "Volume mappings: \"/host:/container\", \"/host:/container:ro\", \"name:/container\" or \"name\"",
                        "items": { "type": "string" }
                    },
                    "name": {
                        "type": ["string", "null"],
                        "description": "Name for the container"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "stop_container",
            description: "Stop a running container",
            input_schema: json!({
                "type": "object",
                "required": ["container_id"],
                "properties": { "container_id": container_id_property() }
            }),
        },
        ToolDefinition {
            name: "remove_container",
            description: "Remove a container",
            input_schema: json!({
                "type": "object",
                "required": ["container_id"],
                "properties": {
                    "container_id": container_id_property(),
                    "force": {
                        "type": "boolean",
                        "description": "Force removal of a running container",
                        "default": false
                    }
                }
            }),
        },
        ToolDefinition {
            name: "fetch_logs",
            description: "Fetch the logs of a container",
            input_schema: json!({
                "type": "object",
                "required": ["container_id"],
                "properties": {
                    "container_id": container_id_property(),
                    "tail": {
                        "type": ["integer", "null"],
                        "description": "Number of lines to show from the end of the logs",
                        "minimum": 0
                    }
                }
            }),
        },
        ToolDefinition {
            name: "pull_image",
            description: "Pull an image from a registry",
            input_schema: json!({
                "type": "object",
                "required": ["image"],
                "properties": {
                    "image": {
                        "type": "string",
                        "description": "Image to pull, e.g. \"ubuntu:latest\""
                    }
                }
            }),
        },
    ]
}

/// Validate `tools/call` arguments against the named tool's input schema.
pub fn validate_arguments(tool: &str, arguments: &Value) -> Result<(), SchemaValidationError> {
    let definition = tool_definitions()
        .into_iter()
        .find(|d| d.name == tool)
        .ok_or_else(|| SchemaValidationError::UnknownTool(tool.to_string()))?;

    validate_value(&definition.input_schema, arguments)
}

fn validate_value(schema: &Value, instance: &Value) -> Result<(), SchemaValidationError> {
    let validator =
        validator_for(schema).map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::ValidationFailed(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_are_unique() {
        let mut names: Vec<&str> = tool_definitions().iter().map(|d| d.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn run_container_requires_image() {
        let err = validate_arguments("run_container", &json!({"detach": true})).unwrap_err();
        assert!(matches!(err, SchemaValidationError::ValidationFailed(_)));
        assert!(err.to_string().contains("image"));
    }

    #[test]
    fn run_container_accepts_full_arguments() {
        validate_arguments(
            "run_container",
            &json!({
                "image": "nginx:latest",
                "command": null,
                "detach": true,
                "env_vars": {"A": "1"},
                "ports": ["8080:80"],
                "volumes": ["data:/data"],
                "name": "web"
            }),
        )
        .unwrap();
    }

    #[test]
    fn negative_tail_is_rejected() {
        let err =
            validate_arguments("fetch_logs", &json!({"container_id": "web", "tail": -1})).unwrap_err();
        assert!(matches!(err, SchemaValidationError::ValidationFailed(_)));
    }

    #[test]
    fn unknown_tool_is_reported() {
        let err = validate_arguments("docker_build", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: docker_build");
    }
}
