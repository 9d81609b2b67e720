//! CLI argument parsing for kibana-exporter
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: KIBANA_EXPORTER_CONFIG)
//! - `--port` / `-p`: Server port (env: KIBANA_EXPORTER_PORT)
//! - `--bind-address`: Server bind address (env: KIBANA_EXPORTER_BIND_ADDRESS)
//! - `--metrics-path`: Metrics endpoint path (env: KIBANA_EXPORTER_METRICS_PATH)
//! - `--kibana-url`: Kibana URL to scrape (env: KIBANA_URL)
//! - `--kibana-username`: Basic auth username (env: KIBANA_USERNAME)
//! - `--kibana-password`: Basic auth password (env: KIBANA_PASSWORD)
//! - `--timeout`: Kibana request timeout in milliseconds (env: KIBANA_EXPORTER_TIMEOUT)
//! - `--insecure-skip-verify`: Skip TLS certificate verification (env: KIBANA_EXPORTER_INSECURE_SKIP_VERIFY)
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: KIBANA_EXPORTER_LOG_LEVEL)
//! - `--log-format`: Log format (text/json, env: KIBANA_EXPORTER_LOG_FORMAT)
//! - `--validate`: Validate configuration without starting server
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// kibana-exporter - Prometheus exporter for Kibana
///
/// Polls the Kibana status API on every scrape and exports
/// health and performance metrics in Prometheus format.
#[derive(Parser, Debug)]
#[command(name = "kibana-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "KIBANA_EXPORTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Server port (overrides config file)
    #[arg(short, long, value_name = "PORT", env = "KIBANA_EXPORTER_PORT")]
    pub port: Option<u16>,

    /// Server bind address (overrides config file)
    /// Supported values: IP addresses (0.0.0.0, 127.0.0.1, ::1) or "localhost"
    #[arg(long, value_name = "ADDRESS", env = "KIBANA_EXPORTER_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Metrics endpoint path (overrides config file)
    /// Must start with '/' and not conflict with '/', '/health' or '/ready'
    #[arg(long, value_name = "PATH", env = "KIBANA_EXPORTER_METRICS_PATH")]
    pub metrics_path: Option<String>,

    /// Kibana URL to scrape (overrides config file)
    #[arg(long, value_name = "URL", env = "KIBANA_URL")]
    pub kibana_url: Option<String>,

    /// Username for Kibana basic auth (overrides config file)
    #[arg(long, value_name = "USERNAME", env = "KIBANA_USERNAME")]
    pub kibana_username: Option<String>,

    /// Password for Kibana basic auth (overrides config file)
    #[arg(long, value_name = "PASSWORD", env = "KIBANA_PASSWORD", hide_env_values = true)]
    pub kibana_password: Option<String>,

    /// Timeout for Kibana API requests in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "KIBANA_EXPORTER_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification when talking to Kibana
    #[arg(long, env = "KIBANA_EXPORTER_INSECURE_SKIP_VERIFY")]
    pub insecure_skip_verify: bool,

    /// Validate configuration without starting server
    #[arg(long)]
    pub validate: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "KIBANA_EXPORTER_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "text",
        env = "KIBANA_EXPORTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text output
    Text,
    /// One JSON object per line
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}
