//! MCP server for Docker.
//!
//! Exposes container and image management tools (`list_containers`,
//! `run_container`, `fetch_logs`, ...), `docker://` resources and a help
//! prompt over JSON-RPC 2.0 stdio transport, compatible with any MCP-aware
//! AI agent.

pub mod bindings;
pub mod config;
pub mod engine;
pub mod handlers;
pub mod protocol;
pub mod reference;
pub mod server;

pub mod schema;
