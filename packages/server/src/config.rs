//! Registry configuration, populated from environment variables.

use std::net::SocketAddr;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("REGISTRY_BIND must be a valid socket address (e.g. 0.0.0.0:8089), got {0:?}")]
    InvalidBind(String),

    #[error("REGISTRY_API_TOKEN must not be blank")]
    BlankToken,
}

/// Runtime configuration for the resource registry.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `REGISTRY_BIND` | `0.0.0.0:8089` | TCP socket address to listen on |
/// | `REGISTRY_DB` | (absent = in-memory) | Path to the SQLite database file |
/// | `REGISTRY_API_TOKEN` | (absent = no check) | Bearer token required on every action |
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Path to the SQLite database file.
    /// `None` means use an in-memory store (data is lost on restart).
    pub db_path: Option<String>,

    /// Shared bearer token. `None` disables the credential check.
    pub api_token: Option<String>,
}

pub const DEFAULT_BIND: &str = "0.0.0.0:8089";

impl RegistryConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_bind = lookup("REGISTRY_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind_addr = raw_bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(raw_bind.clone()))?;

        let api_token = match lookup("REGISTRY_API_TOKEN") {
            Some(t) if t.trim().is_empty() => return Err(ConfigError::BlankToken),
            other => other,
        };

        Ok(Self {
            bind_addr,
            db_path: lookup("REGISTRY_DB").filter(|p| !p.is_empty()),
            api_token,
        })
    }

    /// An open, in-memory configuration bound to an ephemeral local port.
    pub fn ephemeral() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            db_path: None,
            api_token: None,
        }
    }
}
