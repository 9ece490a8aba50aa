use std::sync::Arc;

use mcp_docker_server::config::ServerConfig;
use mcp_docker_server::engine::DockerEngine;
use mcp_docker_server::server::McpServer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("mcp-docker-server: configuration error: {e}");
            std::process::exit(1);
        }
    };

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .init();

    let engine = match DockerEngine::connect(&config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let mut server = McpServer::new(Arc::new(engine));
    if let Err(e) = server.run().await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}
