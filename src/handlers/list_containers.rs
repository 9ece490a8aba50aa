use crate::engine::{ContainerDescriptor, ContainerEngine, EngineError, PortMapping};
use crate::protocol::ListContainersParams;
use crate::reference::short_container_id;

const HEADER: &str = "CONTAINER ID\tIMAGE\tCOMMAND\tCREATED\tSTATUS\tPORTS\tNAMES";

/// Handle a `list_containers` tool call.
///
/// Output mirrors `docker ps`: a tab-separated header line followed by one
/// row per container. The COMMAND column shows only the executable; the
/// full command line is in the `docker://containers` resource.
pub async fn handle(
    params: ListContainersParams,
    engine: &dyn ContainerEngine,
) -> Result<String, EngineError> {
    let containers = engine.list_containers(params.all).await?;
    Ok(render_table(&containers))
}

pub fn render_table(containers: &[ContainerDescriptor]) -> String {
    let rows: Vec<String> = containers
        .iter()
        .map(|c| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                short_container_id(&c.id),
                c.image,
                c.command
                    .as_deref()
                    .and_then(|cmd| cmd.split_whitespace().next())
                    .unwrap_or_default(),
                c.created,
                c.status,
                render_ports(&c.ports),
                c.name,
            )
        })
        .collect();

    format!("{HEADER}\n{}", rows.join("\n"))
}

fn render_ports(ports: &[PortMapping]) -> String {
    ports
        .iter()
        .map(|p| match (&p.host_ip, &p.host_port) {
            (Some(ip), Some(port)) => format!("{ip}:{port}->{}", p.container_port),
            (None, Some(port)) => format!("{port}->{}", p.container_port),
            (_, None) => p.container_port.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
