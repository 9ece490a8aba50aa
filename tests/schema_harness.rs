use mcp_docker_server::schema::{validate_arguments, SchemaValidationError};
use serde_json::json;

#[test]
fn run_container_arguments_validate() {
    validate_arguments(
        "run_container",
        &json!({
            "image": "ubuntu:latest",
            "ports": ["8080:80", "53/udp"],
            "volumes": ["/srv/data:/data:ro"],
            "env_vars": {"MODE": "prod"}
        }),
    )
    .expect("schema validation failed");
}

#[test]
fn run_container_rejects_bad_shapes() {
    let err = validate_arguments("run_container", &json!({})).unwrap_err();
    assert!(matches!(err, SchemaValidationError::ValidationFailed(_)));

    let err = validate_arguments(
        "run_container",
        &json!({"image": "ubuntu:latest", "env_vars": {"MODE": 1}}),
    )
    .unwrap_err();
    assert!(matches!(err, SchemaValidationError::ValidationFailed(_)));
}

#[test]
fn tool_arguments_follow_advertised_schema() {
    validate_arguments("pull_image", &json!({"image": "redis:7"})).unwrap();
    validate_arguments("list_containers", &json!({"all": true})).unwrap();
    validate_arguments("remove_container", &json!({"container_id": "web", "force": false})).unwrap();

    assert!(validate_arguments("list_containers", &json!({"all": "yes"})).is_err());
    assert!(validate_arguments("pull_image", &json!({"image": 7})).is_err());
}
