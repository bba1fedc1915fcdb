//! Configuration for the Simplex server.
//!
//! All knobs are driven by environment variables with sensible defaults, so
//! the binary can run with no configuration at all.

use std::net::{IpAddr, SocketAddr};

use crate::error::{SimplexError, SimplexResult};

/// Server configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Bind host for the listener.
    pub host: String,
    /// Bind port for the listener. Port 0 asks the OS for an ephemeral port.
    pub port: u16,
    /// Listen backlog depth.
    pub backlog: u32,
    /// Maximum number of connections served concurrently; further accepts
    /// wait until a slot frees up.
    pub max_connections: usize,
    /// Log level filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
            backlog: 512,
            max_connections: 1024,
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `HTTP_HOST`, `HTTP_PORT`, `HTTP_BACKLOG`,
    /// `MAX_CONNECTIONS`, `LOG_LEVEL`. Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns a configuration error when a numeric variable is set but does
    /// not parse.
    pub fn from_env() -> SimplexResult<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("HTTP_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("HTTP_PORT") {
            config.port = port
                .parse()
                .map_err(|_| SimplexError::Config(format!("invalid HTTP_PORT value: {port}")))?;
        }
        if let Ok(backlog) = std::env::var("HTTP_BACKLOG") {
            config.backlog = backlog.parse().map_err(|_| {
                SimplexError::Config(format!("invalid HTTP_BACKLOG value: {backlog}"))
            })?;
        }
        if let Ok(max) = std::env::var("MAX_CONNECTIONS") {
            config.max_connections = max.parse().map_err(|_| {
                SimplexError::Config(format!("invalid MAX_CONNECTIONS value: {max}"))
            })?;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// The socket address to bind, built from `host` and `port`.
    pub fn socket_addr(&self) -> SimplexResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| SimplexError::Config(format!("invalid bind host: {}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
