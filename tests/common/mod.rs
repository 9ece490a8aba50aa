//! In-memory container engine that records what handlers ask of it.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mcp_docker_server::engine::{
    ContainerDescriptor, ContainerEngine, ContainerRunSpec, EngineError, ImageDescriptor,
    PortMapping, RunOutcome,
};
use mcp_docker_server::protocol::{JsonRpcRequest, RpcId};
use serde_json::{json, Value};

pub const NEW_CONTAINER_ID: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
pub const NGINX_ID: &str = "4f66ad9a0b2e8f3c1d7a4f66ad9a0b2e8f3c1d7a4f66ad9a0b2e8f3c1d7a1234";
pub const APP_IMAGE_ID: &str =
    "sha256:9c7a54a9a43cca047013b82af109fe963fde787f63f9e016fdc3384500c2823d";

#[derive(Default)]
struct State {
    containers: Vec<ContainerDescriptor>,
    images: Vec<ImageDescriptor>,
    inspect: HashMap<String, Value>,
    logs: HashMap<String, String>,
    local_images: HashSet<String>,
    registry: HashMap<String, String>,
    attached_output: String,
    failure: Option<String>,
    runs: Vec<ContainerRunSpec>,
    stopped: Vec<String>,
    removed: Vec<(String, bool)>,
    log_requests: Vec<(String, Option<u64>)>,
    pulled: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<State>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with one running nginx container and one `app:v1` image.
    pub fn populated() -> Self {
        let engine = Self::new();
        engine.add_container(
            ContainerDescriptor {
                id: NGINX_ID.into(),
                name: "web".into(),
                image: "nginx:latest".into(),
                status: "running".into(),
                created: "2024-05-01T12:00:00Z".into(),
                ports: vec![PortMapping {
                    container_port: "80/tcp".into(),
                    host_ip: Some("0.0.0.0".into()),
                    host_port: Some("8080".into()),
                }],
                command: Some("nginx -g 'daemon off;'".into()),
            },
            "hello from nginx\n",
        );
        engine.add_image(ImageDescriptor {
            id: APP_IMAGE_ID.into(),
            tags: vec!["app:v1".into()],
            created: "2024-04-01T08:30:00Z".into(),
            size: 52_428_800,
            labels: BTreeMap::from([("maintainer".to_string(), "ops".to_string())]),
        });
        engine.add_local_image("ubuntu:latest");
        engine
    }

    pub fn add_container(&self, container: ContainerDescriptor, logs: &str) {
        let mut state = self.state.lock().unwrap();
        let attrs = json!({
            "Id": container.id,
            "Name": format!("/{}", container.name),
            "Config": { "Image": container.image },
            "State": { "Status": container.status, "Running": container.status == "running" }
        });
        state.inspect.insert(container.id.clone(), attrs.clone());
        state.inspect.insert(container.name.clone(), attrs);
        state.logs.insert(container.id.clone(), logs.to_string());
        state.logs.insert(container.name.clone(), logs.to_string());
        state.containers.push(container);
    }

    pub fn add_image(&self, image: ImageDescriptor) {
        let mut state = self.state.lock().unwrap();
        for tag in &image.tags {
            state.local_images.insert(tag.clone());
        }
        state.images.push(image);
    }

    pub fn add_local_image(&self, reference: &str) {
        self.state.lock().unwrap().local_images.insert(reference.to_string());
    }

    pub fn add_registry_image(&self, reference: &str, id: &str) {
        self.state
            .lock()
            .unwrap()
            .registry
            .insert(reference.to_string(), id.to_string());
    }

    pub fn set_attached_output(&self, output: &str) {
        self.state.lock().unwrap().attached_output = output.to_string();
    }

    /// Make every subsequent call fail with an engine error.
    pub fn fail_with(&self, message: &str) {
        self.state.lock().unwrap().failure = Some(message.to_string());
    }

    pub fn runs(&self) -> Vec<ContainerRunSpec> {
        self.state.lock().unwrap().runs.clone()
    }

    pub fn stopped(&self) -> Vec<String> {
        self.state.lock().unwrap().stopped.clone()
    }

    pub fn removed(&self) -> Vec<(String, bool)> {
        self.state.lock().unwrap().removed.clone()
    }

    pub fn log_requests(&self) -> Vec<(String, Option<u64>)> {
        self.state.lock().unwrap().log_requests.clone()
    }

    pub fn pulled(&self) -> Vec<String> {
        self.state.lock().unwrap().pulled.clone()
    }

    fn check(&self) -> Result<(), EngineError> {
        match &self.state.lock().unwrap().failure {
            Some(message) => Err(EngineError::engine(message)),
            None => Ok(()),
        }
    }

    fn require_container(&self, id: &str) -> Result<(), EngineError> {
        if self.state.lock().unwrap().inspect.contains_key(id) {
            Ok(())
        } else {
            Err(EngineError::container_not_found(id))
        }
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerDescriptor>, EngineError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .containers
            .iter()
            .filter(|c| all || c.status == "running")
            .cloned()
            .collect())
    }

    async fn list_images(&self) -> Result<Vec<ImageDescriptor>, EngineError> {
        self.check()?;
        Ok(self.state.lock().unwrap().images.clone())
    }

    async fn inspect_container(&self, id: &str) -> Result<Value, EngineError> {
        self.check()?;
        self.require_container(id)?;
        Ok(self.state.lock().unwrap().inspect[id].clone())
    }

    async fn run_container(&self, spec: &ContainerRunSpec) -> Result<RunOutcome, EngineError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.runs.push(spec.clone());
        if !state.local_images.contains(&spec.image) {
            return Err(EngineError::image_not_found(&spec.image));
        }
        if spec.detach {
            Ok(RunOutcome::Detached {
                id: NEW_CONTAINER_ID.to_string(),
            })
        } else {
            Ok(RunOutcome::Completed {
                id: NEW_CONTAINER_ID.to_string(),
                output: state.attached_output.clone(),
            })
        }
    }

    async fn stop_container(&self, id: &str) -> Result<(), EngineError> {
        self.check()?;
        self.require_container(id)?;
        self.state.lock().unwrap().stopped.push(id.to_string());
        Ok(())
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<(), EngineError> {
        self.check()?;
        self.require_container(id)?;
        self.state
            .lock()
            .unwrap()
            .removed
            .push((id.to_string(), force));
        Ok(())
    }

    async fn container_logs(&self, id: &str, tail: Option<u64>) -> Result<String, EngineError> {
        self.check()?;
        self.require_container(id)?;
        let mut state = self.state.lock().unwrap();
        state.log_requests.push((id.to_string(), tail));
        Ok(state.logs.get(id).cloned().unwrap_or_default())
    }

    async fn pull_image(&self, reference: &str) -> Result<String, EngineError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let id = state.registry.get(reference).cloned().ok_or_else(|| {
            EngineError::engine(format!(
                "pull access denied for {reference}, repository does not exist"
            ))
        })?;
        state.pulled.push(reference.to_string());
        state.local_images.insert(reference.to_string());
        Ok(id)
    }
}

pub fn request(id: i64, method: &str, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: Some(RpcId::Number(id)),
        method: method.into(),
        params,
    }
}

pub fn tool_call(id: i64, name: &str, arguments: Value) -> JsonRpcRequest {
    request(
        id,
        "tools/call",
        Some(json!({ "name": name, "arguments": arguments })),
    )
}
