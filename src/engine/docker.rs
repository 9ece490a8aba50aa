//! Docker daemon implementation of [`ContainerEngine`] using bollard.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, ListContainersOptions, LogOutput,
    LogsOptions, RemoveContainerOptions, StartContainerOptions, StopContainerOptions,
    WaitContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::image::{CreateImageOptions, ListImagesOptions};
use bollard::models::{ContainerSummary, HostConfig, ImageSummary, Port, PortBinding};
use bollard::Docker;
use chrono::{DateTime, SecondsFormat};
use futures::StreamExt;
use tracing::{debug, info, warn};

use super::{
    ContainerDescriptor, ContainerEngine, ContainerRunSpec, EngineError, ImageDescriptor,
    PortMapping, RunOutcome,
};
use crate::config::ServerConfig;
use crate::reference::{short_image_id, split_repo_tag};

/// Client timeout used when connecting to an explicit socket path.
const SOCKET_TIMEOUT_SECS: u64 = 120;

/// Engine backed by a Docker-compatible daemon.
#[derive(Clone)]
pub struct DockerEngine {
    docker: Docker,
    stop_timeout_secs: i64,
}

impl DockerEngine {
    /// Connect using the configured socket, or the local defaults
    /// (`DOCKER_HOST`, then the platform socket).
    pub fn connect(config: &ServerConfig) -> Result<Self, EngineError> {
        let docker = match &config.docker_socket {
            Some(path) => {
                let path = path.to_string_lossy();
                info!(socket = %path, "Connecting to container engine");
                Docker::connect_with_unix(&path, SOCKET_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            None => {
                info!("Connecting to container engine with local defaults");
                Docker::connect_with_local_defaults()
            }
        }
        .map_err(|e| EngineError::engine(format!("Failed to connect to Docker: {e}")))?;

        let stop_timeout_secs = i64::try_from(config.stop_timeout.as_secs()).map_err(|_| {
            EngineError::engine(format!(
                "Stop timeout of {}s is out of range",
                config.stop_timeout.as_secs()
            ))
        })?;

        Ok(Self::from_docker(docker, stop_timeout_secs))
    }

    pub fn from_docker(docker: Docker, stop_timeout_secs: i64) -> Self {
        Self {
            docker,
            stop_timeout_secs,
        }
    }

    async fn create_container(
        &self,
        spec: &ContainerRunSpec,
    ) -> Result<String, BollardError> {
        let options = spec.name.as_ref().map(|name| CreateContainerOptions {
            name: name.clone(),
            platform: None,
        });
        let response = self
            .docker
            .create_container(options, container_config(spec))
            .await?;
        for warning in &response.warnings {
            warn!(image = %spec.image, "Engine warning on create: {warning}");
        }
        Ok(response.id)
    }

    async fn pull(&self, reference: &str) -> Result<(), BollardError> {
        let (from_image, tag) = pull_target(reference);
        let options = CreateImageOptions {
            from_image: from_image.to_string(),
            tag: tag.to_string(),
            ..Default::default()
        };

        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(progress) = stream.next().await {
            let progress = progress?;
            if let Some(status) = progress.status {
                debug!(image = %reference, "{status}");
            }
        }
        Ok(())
    }

    /// Wait for a container to stop and return its exit status.
    async fn wait(&self, id: &str) -> Result<i64, EngineError> {
        let options = WaitContainerOptions {
            condition: "not-running",
        };
        let mut stream = self.docker.wait_container(id, Some(options));
        match stream.next().await {
            Some(Ok(response)) => Ok(response.status_code),
            Some(Err(BollardError::DockerContainerWaitError { code, .. })) => Ok(code),
            Some(Err(e)) => Err(container_error(e, id)),
            None => Err(EngineError::engine(format!(
                "Engine closed the wait stream for container {id}"
            ))),
        }
    }

    async fn collect_logs(
        &self,
        id: &str,
        options: LogsOptions<String>,
    ) -> Result<String, EngineError> {
        let mut logs = self.docker.logs(id, Some(options));
        let mut output = String::new();

        while let Some(chunk) = logs.next().await {
            match chunk {
                Ok(LogOutput::StdOut { message })
                | Ok(LogOutput::StdErr { message })
                | Ok(LogOutput::Console { message }) => {
                    output.push_str(&String::from_utf8_lossy(&message));
                }
                Ok(LogOutput::StdIn { .. }) => {}
                Err(e) => return Err(container_error(e, id)),
            }
        }

        Ok(output)
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerDescriptor>, EngineError> {
        let options = ListContainersOptions::<String> {
            all,
            ..Default::default()
        };
        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| EngineError::engine(server_message(e)))?;

        Ok(containers.into_iter().map(container_descriptor).collect())
    }

    async fn list_images(&self) -> Result<Vec<ImageDescriptor>, EngineError> {
        let options = ListImagesOptions::<String> {
            all: false,
            ..Default::default()
        };
        let images = self
            .docker
            .list_images(Some(options))
            .await
            .map_err(|e| EngineError::engine(server_message(e)))?;

        Ok(images.into_iter().map(image_descriptor).collect())
    }

    async fn inspect_container(&self, id: &str) -> Result<serde_json::Value, EngineError> {
        let info = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| container_error(e, id))?;

        serde_json::to_value(&info)
            .map_err(|e| EngineError::engine(format!("Cannot encode inspect response: {e}")))
    }

    async fn run_container(&self, spec: &ContainerRunSpec) -> Result<RunOutcome, EngineError> {
        debug!(
            image = %spec.image,
            ports = ?spec.ports.shorthands(),
            volumes = ?spec.volumes.shorthands(),
            "Creating container"
        );
        let id = create_pulling_if_missing(
            &spec.image,
            move || self.create_container(spec),
            move || self.pull(&spec.image),
        )
        .await?;

        self.docker
            .start_container(&id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| container_error(e, &id))?;
        info!(container = %id, image = %spec.image, "Container started");

        if spec.detach {
            return Ok(RunOutcome::Detached { id });
        }

        let status = self.wait(&id).await?;
        let stdout = self.collect_logs(&id, logs_options(true, false, None)).await?;

        if status != 0 {
            let stderr = self.collect_logs(&id, logs_options(false, true, None)).await?;
            let command = spec
                .command
                .as_ref()
                .map(|argv| argv.join(" "))
                .unwrap_or_default();
            return Err(EngineError::engine(format!(
                "Command '{command}' in image '{}' returned non-zero exit status {status}: {}",
                spec.image,
                stderr.trim_end()
            )));
        }

        Ok(RunOutcome::Completed { id, output: stdout })
    }

    async fn stop_container(&self, id: &str) -> Result<(), EngineError> {
        let options = StopContainerOptions {
            t: self.stop_timeout_secs,
        };
        match self.docker.stop_container(id, Some(options)).await {
            Ok(()) => Ok(()),
            // 304: already stopped.
            Err(e) if status_code(&e) == Some(304) => Ok(()),
            Err(e) => Err(container_error(e, id)),
        }
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<(), EngineError> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.docker
            .remove_container(id, Some(options))
            .await
            .map_err(|e| container_error(e, id))
    }

    async fn container_logs(&self, id: &str, tail: Option<u64>) -> Result<String, EngineError> {
        self.collect_logs(id, logs_options(true, true, tail)).await
    }

    async fn pull_image(&self, reference: &str) -> Result<String, EngineError> {
        self.pull(reference)
            .await
            .map_err(|e| EngineError::engine(server_message(e)))?;

        let image = self
            .docker
            .inspect_image(reference)
            .await
            .map_err(|e| EngineError::engine(server_message(e)))?;

        image
            .id
            .ok_or_else(|| EngineError::engine(format!("Engine reported no ID for {reference}")))
    }
}

/// Create a container, pulling its image once when the engine reports it
/// missing (404) and creating again. A 404 from the pull or the second create
/// means the image does not exist anywhere the engine can reach.
async fn create_pulling_if_missing<C, CF, P, PF>(
    image: &str,
    mut create: C,
    pull: P,
) -> Result<String, EngineError>
where
    C: FnMut() -> CF,
    CF: Future<Output = Result<String, BollardError>>,
    P: FnOnce() -> PF,
    PF: Future<Output = Result<(), BollardError>>,
{
    match create().await {
        Ok(id) => return Ok(id),
        Err(e) if status_code(&e) == Some(404) => {
            info!(image = %image, "Image not present locally, pulling");
        }
        Err(e) => return Err(EngineError::engine(server_message(e))),
    }

    pull().await.map_err(|e| image_error(e, image))?;
    create().await.map_err(|e| image_error(e, image))
}

/// Repository and tag to request from the registry. A reference without a
/// tag pulls `latest`; a digest reference is passed whole with no tag.
fn pull_target(reference: &str) -> (&str, &str) {
    match split_repo_tag(reference) {
        (_, None) if reference.contains('@') => (reference, ""),
        (repo, None) => (repo, "latest"),
        (repo, Some(tag)) => (repo, tag),
    }
}

fn logs_options(stdout: bool, stderr: bool, tail: Option<u64>) -> LogsOptions<String> {
    LogsOptions::<String> {
        stdout,
        stderr,
        follow: false,
        timestamps: false,
        tail: tail.map(|n| n.to_string()).unwrap_or_else(|| "all".to_string()),
        ..Default::default()
    }
}

fn container_config(spec: &ContainerRunSpec) -> Config<String> {
    let mut exposed_ports = HashMap::new();
    let mut port_bindings = HashMap::new();
    for (container_port, host_port) in spec.ports.iter() {
        exposed_ports.insert(container_port.to_string(), HashMap::new());
        port_bindings.insert(
            container_port.to_string(),
            Some(vec![PortBinding {
                host_ip: None,
                host_port: Some(host_port.unwrap_or_default().to_string()),
            }]),
        );
    }

    let binds: Vec<String> = spec
        .volumes
        .iter()
        .map(|(source, target)| format!("{source}:{}:{}", target.bind, target.mode))
        .collect();

    let host_config = HostConfig {
        port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
        binds: (!binds.is_empty()).then_some(binds),
        ..Default::default()
    };

    Config {
        image: Some(spec.image.clone()),
        cmd: spec.command.clone(),
        env: (!spec.env.is_empty()).then(|| spec.env.clone()),
        exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
        host_config: Some(host_config),
        attach_stdout: Some(!spec.detach),
        attach_stderr: Some(!spec.detach),
        ..Default::default()
    }
}

fn container_descriptor(summary: ContainerSummary) -> ContainerDescriptor {
    let image = match summary.image {
        Some(image) if !image.is_empty() => image,
        _ => summary
            .image_id
            .as_deref()
            .map(short_image_id)
            .unwrap_or_default()
            .to_string(),
    };
    let name = summary
        .names
        .and_then(|names| names.into_iter().next())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default();

    ContainerDescriptor {
        id: summary.id.unwrap_or_default(),
        name,
        image,
        status: summary.state.unwrap_or_default(),
        created: summary.created.map(rfc3339).unwrap_or_default(),
        ports: summary
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(port_mapping)
            .collect(),
        command: summary.command.filter(|c| !c.is_empty()),
    }
}

fn port_mapping(port: Port) -> PortMapping {
    let protocol = port
        .typ
        .map(|t| t.to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "tcp".to_string());
    PortMapping {
        container_port: format!("{}/{protocol}", port.private_port),
        host_ip: port.ip.filter(|ip| !ip.is_empty()),
        host_port: port.public_port.map(|p| p.to_string()),
    }
}

fn image_descriptor(summary: ImageSummary) -> ImageDescriptor {
    ImageDescriptor {
        id: summary.id,
        tags: summary
            .repo_tags
            .into_iter()
            .filter(|t| t != "<none>:<none>")
            .collect(),
        created: rfc3339(summary.created),
        size: summary.size.max(0) as u64,
        labels: summary.labels.into_iter().collect(),
    }
}

fn rfc3339(unix_secs: i64) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn status_code(e: &BollardError) -> Option<u16> {
    match e {
        BollardError::DockerResponseServerError { status_code, .. } => Some(*status_code),
        _ => None,
    }
}

/// Prefer the daemon's own message over bollard's wrapper text.
fn server_message(e: BollardError) -> String {
    match e {
        BollardError::DockerResponseServerError { message, .. } => message,
        other => other.to_string(),
    }
}

fn image_error(e: BollardError, image: &str) -> EngineError {
    match status_code(&e) {
        Some(404) => EngineError::image_not_found(image),
        _ => EngineError::engine(server_message(e)),
    }
}

fn container_error(e: BollardError, id: &str) -> EngineError {
    match status_code(&e) {
        Some(404) => EngineError::container_not_found(id),
        _ => EngineError::engine(server_message(e)),
    }
}
