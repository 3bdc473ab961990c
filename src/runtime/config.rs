//! Decorator server configuration.

use crate::error::DecoratorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming the downstream URL.
pub const ENV_DOWNSTREAM_URL: &str = "DECORATOR_DOWNSTREAM_URL";
/// Environment variable naming the bind host.
pub const ENV_HOST: &str = "DECORATOR_HOST";
/// Environment variable naming the bind port.
pub const ENV_PORT: &str = "DECORATOR_PORT";
/// Environment variable holding the downstream timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "DECORATOR_TIMEOUT_SECS";
/// Environment variable holding the maximum request body size in bytes.
pub const ENV_MAX_BODY_SIZE: &str = "DECORATOR_MAX_BODY_SIZE";
/// Environment variable pointing at a JSON config file.
pub const ENV_CONFIG_FILE: &str = "DECORATOR_CONFIG";

/// Configuration for the decorator server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// URL normalized documents are POSTed to.
    pub downstream_url: String,
    /// Downstream timeout in seconds.
    pub downstream_timeout: u64,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Whether to serve `/_health`.
    pub enable_health: bool,
}

impl Default for DecoratorConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            downstream_url: String::new(),
            downstream_timeout: 30,
            max_body_size: 10 * 1024 * 1024, // 10MB
            enable_health: true,
        }
    }
}

impl DecoratorConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the downstream URL.
    pub fn downstream_url(mut self, url: impl Into<String>) -> Self {
        self.downstream_url = url.into();
        self
    }

    /// Set the downstream timeout in seconds.
    pub fn downstream_timeout(mut self, secs: u64) -> Self {
        self.downstream_timeout = secs;
        self
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.downstream_timeout)
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, DecoratorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a key lookup.
    ///
    /// A config file named by `DECORATOR_CONFIG` is read first; individual
    /// variables then override its fields.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DecoratorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_FILE) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(url) = lookup(ENV_DOWNSTREAM_URL) {
            config.downstream_url = url;
        }
        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_var(ENV_PORT, &port)?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.downstream_timeout = parse_var(ENV_TIMEOUT_SECS, &secs)?;
        }
        if let Some(size) = lookup(ENV_MAX_BODY_SIZE) {
            config.max_body_size = parse_var(ENV_MAX_BODY_SIZE, &size)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &str) -> Result<Self, DecoratorError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DecoratorError::Config(format!("cannot read '{}': {}", path, e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| DecoratorError::Config(format!("cannot parse '{}': {}", path, e)))
    }

    /// Check that the config can be served.
    pub fn validate(&self) -> Result<(), DecoratorError> {
        if self.downstream_url.is_empty() {
            return Err(DecoratorError::Config(format!(
                "no downstream URL configured (set {})",
                ENV_DOWNSTREAM_URL
            )));
        }
        crate::downstream::parse_http_uri(&self.downstream_url)?;
        if self.downstream_timeout == 0 {
            return Err(DecoratorError::Config(
                "downstream timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DecoratorError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DecoratorError::Config(format!("{}='{}': {}", key, value, e)))
}
