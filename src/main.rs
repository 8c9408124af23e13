//! TypeScript Development Server
//!
//! Serves a static directory and compiles TypeScript on the fly.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ trace / request-id / timeout / limits
//!                          │
//!                          ▼
//!                   transpile middleware ──── foo.ts exists? ──▶ compiled JS (200)
//!                          │ no
//!                          ▼
//!                   static files (ServeDir) ──▶ asset or 404
//! ```

use std::path::PathBuf;

use clap::Parser;

use ts_dev_server::config::{load_config, validate_config, ConfigError, ServerConfig};
use ts_dev_server::lifecycle::wait_for_shutdown_signal;
use ts_dev_server::observability::{logging, metrics};
use ts_dev_server::DevServer;

#[derive(Parser)]
#[command(name = "ts-dev-server", version)]
#[command(about = "Development server that compiles TypeScript on request", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Static root directory (overrides the config file)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Bind address, e.g. 127.0.0.1:3000 (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(root) = cli.root {
        config.static_files.root = root;
    }
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        root = %config.static_files.root.display(),
        "ts-dev-server starting"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = DevServer::new(config)?;
    let handle = server.start().await?;

    wait_for_shutdown_signal().await;
    handle.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
