//! kibana-exporter - Prometheus exporter for Kibana
//!
//! This binary provides a Prometheus-compatible metrics endpoint
//! that reports Kibana health and resource usage from its status API.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use kibana_exporter::{cli::Cli, config::Config, server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    kibana_exporter::init_logging(&cli.log_level.to_string(), cli.log_format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Kibana Prometheus Exporter"
    );

    let config = Config::load_or_default(&cli.config)?.with_overrides(&cli)?;

    if cli.validate {
        println!("Configuration is valid");
        println!("  Kibana URL:    {}", config.kibana.url);
        println!("  Timeout:       {}ms", config.kibana.timeout_ms);
        println!(
            "  Basic auth:    {}",
            if config.kibana.username.is_some() { "enabled" } else { "disabled" }
        );
        println!("  Listen:        {}:{}", config.server.bind_address, config.server.port);
        println!("  Metrics path:  {}", config.server.path);
        return Ok(());
    }

    info!(kibana_url = %config.kibana.url, "Configured Kibana endpoint");

    server::run(config).await?;

    Ok(())
}
