//! Configuration management for kibana-exporter
//!
//! Handles loading and validating configuration from YAML files and
//! applying command-line overrides on top.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::cli::Cli;

/// Paths served by the exporter itself; the metrics path may not shadow them
const RESERVED_PATHS: &[&str] = &["/", "/health", "/ready"];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Kibana endpoint configuration
    #[serde(default)]
    pub kibana: KibanaConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Kibana endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KibanaConfig {
    /// Kibana base URL
    #[serde(default = "default_kibana_url")]
    pub url: String,

    /// Optional username for basic auth
    #[serde(default)]
    pub username: Option<String>,

    /// Optional password for basic auth
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

// Default value functions
fn default_kibana_url() -> String {
    "http://localhost:5601".to_string()
}

fn default_timeout() -> u64 {
    10_000
}

fn default_port() -> u16 {
    9684
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

impl Default for KibanaConfig {
    fn default() -> Self {
        Self {
            url: default_kibana_url(),
            username: None,
            password: None,
            timeout_ms: default_timeout(),
            insecure_skip_verify: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            path: default_metrics_path(),
            bind_address: default_bind_address(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Apply command-line (and environment) overrides, then re-validate
    pub fn with_overrides(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(ref bind_address) = cli.bind_address {
            self.server.bind_address = bind_address.clone();
        }
        if let Some(ref path) = cli.metrics_path {
            self.server.path = path.clone();
        }
        if let Some(ref url) = cli.kibana_url {
            self.kibana.url = url.clone();
        }
        if let Some(ref username) = cli.kibana_username {
            self.kibana.username = Some(username.clone());
        }
        if let Some(ref password) = cli.kibana_password {
            self.kibana.password = Some(password.clone());
        }
        if let Some(timeout) = cli.timeout {
            self.kibana.timeout_ms = timeout;
        }
        if cli.insecure_skip_verify {
            self.kibana.insecure_skip_verify = true;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Metrics path must start with '/'".to_string(),
            ));
        }

        if RESERVED_PATHS.contains(&self.server.path.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Metrics path '{}' conflicts with a built-in endpoint",
                self.server.path
            )));
        }

        if self.server.bind_address != "localhost"
            && self.server.bind_address.parse::<std::net::IpAddr>().is_err()
        {
            return Err(ConfigError::ValidationError(format!(
                "Invalid bind_address '{}': use an IP address or 'localhost'",
                self.server.bind_address
            )));
        }

        if self.kibana.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Kibana timeout must be greater than 0".to_string(),
            ));
        }

        let url = url::Url::parse(&self.kibana.url).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid Kibana URL '{}': {}", self.kibana.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "Kibana URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(())
    }
}
