//! Container engine seam.
//!
//! Handlers only see [`ContainerEngine`] and the descriptor records defined
//! here. The Docker daemon implementation lives in [`docker`]; tests plug in
//! their own implementation.

pub mod docker;
pub mod error;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::bindings::{PortBindings, VolumeBindings};

pub use docker::DockerEngine;
pub use error::{EngineError, Missing};

/// One published or exposed container port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    /// Port and protocol inside the container, e.g. `"80/tcp"`.
    pub container_port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_port: Option<String>,
}

/// Summary of a container as listed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerDescriptor {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    /// RFC 3339 creation time, empty when the engine did not report one.
    pub created: String,
    pub ports: Vec<PortMapping>,
    pub command: Option<String>,
}

/// Summary of a locally stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDescriptor {
    pub id: String,
    pub tags: Vec<String>,
    pub created: String,
    /// Size in bytes.
    pub size: u64,
    pub labels: BTreeMap<String, String>,
}

/// Everything the engine needs to create and start a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRunSpec {
    pub image: String,
    pub command: Option<Vec<String>>,
    pub detach: bool,
    /// `KEY=VALUE` pairs.
    pub env: Vec<String>,
    pub ports: PortBindings,
    pub volumes: VolumeBindings,
    pub name: Option<String>,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Started in the background.
    Detached { id: String },
    /// Ran to completion with exit status 0; `output` is its stdout.
    Completed { id: String, output: String },
}

/// Container engine operations used by the server.
///
/// Implementations must be safe to share across concurrent calls.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// List containers; only running ones unless `all` is set.
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerDescriptor>, EngineError>;

    async fn list_images(&self) -> Result<Vec<ImageDescriptor>, EngineError>;

    /// Full inspect document for a container, as the engine reports it.
    async fn inspect_container(&self, id: &str) -> Result<serde_json::Value, EngineError>;

    async fn run_container(&self, spec: &ContainerRunSpec) -> Result<RunOutcome, EngineError>;

    async fn stop_container(&self, id: &str) -> Result<(), EngineError>;

    async fn remove_container(&self, id: &str, force: bool) -> Result<(), EngineError>;

    /// Combined stdout and stderr, optionally limited to the last `tail` lines.
    async fn container_logs(&self, id: &str, tail: Option<u64>) -> Result<String, EngineError>;

    /// Pull an image and return its full ID.
    async fn pull_image(&self, reference: &str) -> Result<String, EngineError>;
}
