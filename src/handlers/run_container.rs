use tracing::info;

use crate::bindings::{PortBindings, VolumeBindings};
use crate::engine::{ContainerEngine, ContainerRunSpec, EngineError, RunOutcome};
use crate::protocol::RunContainerParams;
use crate::reference::short_container_id;

/// Turn `run_container` arguments into an engine request.
///
/// Port and volume shorthands are normalized here; the command string is
/// split with shell quoting rules. Only an unbalanced quote in the command
/// is rejected.
pub fn run_spec(params: RunContainerParams) -> Result<ContainerRunSpec, String> {
    let command = match params.command.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(cmd) => Some(shell_words::split(cmd).map_err(|e| format!("command: {e}"))?),
    };

    let env = params
        .env_vars
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();

    Ok(ContainerRunSpec {
        image: params.image,
        command,
        detach: params.detach,
        env,
        ports: PortBindings::parse(&params.ports.unwrap_or_default()),
        volumes: VolumeBindings::parse(&params.volumes.unwrap_or_default()),
        name: params.name.filter(|n| !n.is_empty()),
    })
}

/// Handle a `run_container` tool call.
///
/// Detached runs report the short ID of the new container; attached runs
/// return whatever the container wrote to stdout.
pub async fn handle(
    spec: &ContainerRunSpec,
    engine: &dyn ContainerEngine,
) -> Result<String, EngineError> {
    match engine.run_container(spec).await? {
        RunOutcome::Detached { id } => {
            let short = short_container_id(&id);
            info!(container = %short, image = %spec.image, "Container running in background");
            Ok(format!("Container started: {short}"))
        }
        RunOutcome::Completed { output, .. } => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn params(image: &str) -> RunContainerParams {
        RunContainerParams {
            image: image.into(),
            command: None,
            detach: true,
            env_vars: None,
            ports: None,
            volumes: None,
            name: None,
        }
    }

    #[test]
    fn command_is_split_with_quotes() {
        let mut p = params("alpine");
        p.command = Some(r#"sh -c "echo hello world""#.into());
        let spec = run_spec(p).unwrap();
        assert_eq!(
            spec.command.unwrap(),
            vec!["sh".to_string(), "-c".to_string(), "echo hello world".to_string()]
        );
    }

    #[test]
    fn unbalanced_quote_is_rejected() {
        let mut p = params("alpine");
        p.command = Some("echo 'oops".into());
        assert!(run_spec(p).unwrap_err().starts_with("command:"));
    }

    #[test]
    fn blank_command_uses_image_default() {
        let mut p = params("alpine");
        p.command = Some("   ".into());
        assert!(run_spec(p).unwrap().command.is_none());
    }

    #[test]
    fn env_and_bindings_are_normalized() {
        let mut p = params("ubuntu:latest");
        p.env_vars = Some(BTreeMap::from([
            ("B".to_string(), "2".to_string()),
            ("A".to_string(), "1".to_string()),
        ]));
        p.ports = Some(vec!["8080:80".into()]);
        p.volumes = Some(vec!["data".into()]);
        p.name = Some(String::new());

        let spec = run_spec(p).unwrap();
        assert_eq!(spec.env, vec!["A=1".to_string(), "B=2".to_string()]);
        assert_eq!(spec.ports.get("80/tcp"), Some(Some("8080")));
        assert_eq!(spec.volumes.get("data").unwrap().bind, "data");
        assert!(spec.name.is_none());
    }
}
