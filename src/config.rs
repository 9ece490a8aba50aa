use std::path::PathBuf;
use std::time::Duration;

/// Default grace period before a stopped container is killed (10 seconds).
const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;

/// Default log filter when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub docker_socket: Option<PathBuf>,
    pub stop_timeout: Duration,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            docker_socket: None,
            stop_timeout: Duration::from_secs(DEFAULT_STOP_TIMEOUT_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `DOCKER_MCP_SOCKET` (optional): engine socket path; bollard's local
    ///   defaults (including `DOCKER_HOST`) are used when unset
    /// - `DOCKER_MCP_STOP_TIMEOUT_SECS` (optional, default 10): seconds to wait
    ///   before a stopping container is killed
    /// - `DOCKER_MCP_LOG` (optional, default `info`): log filter when `RUST_LOG` is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let docker_socket = match lookup("DOCKER_MCP_SOCKET") {
            Some(val) if val.trim().is_empty() => {
                return Err(ConfigError::Empty { name: "DOCKER_MCP_SOCKET" });
            }
            Some(val) => Some(PathBuf::from(val)),
            None => None,
        };

        let stop_timeout = match lookup("DOCKER_MCP_STOP_TIMEOUT_SECS") {
            // The engine API takes the grace period as a signed 64-bit count.
            Some(val) => match val.trim().parse::<i64>() {
                Ok(secs) if secs >= 0 => Duration::from_secs(secs.unsigned_abs()),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "DOCKER_MCP_STOP_TIMEOUT_SECS",
                        value: val.clone(),
                    })
                }
            },
            None => defaults.stop_timeout,
        };

        let log_filter = lookup("DOCKER_MCP_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            docker_socket,
            stop_timeout,
            log_filter,
        })
    }
}
