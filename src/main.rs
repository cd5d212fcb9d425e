//! item-gateway
//!
//! Routes `/items/{category}/...` to one of the category's backend instances.
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!  Client Request     │  ┌──────────┐   ┌────────────┐   ┌─────────┐ │
//!  ───────────────────┼─▶│ auth gate│──▶│ registry + │──▶│ hyper   │─┼──▶ Backend
//!                     │  │          │   │ random pick│   │ client  │ │
//!                     │  └──────────┘   └────────────┘   └─────────┘ │
//!  Client Response    │        │ 401          │ 404        │ 502/504 │
//!  ◀──────────────────┼────────┴──────────────┴────────────┘         │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use item_gateway::config::{load_config, GatewayConfig};
use item_gateway::lifecycle::Shutdown;
use item_gateway::observability::{logging, metrics};
use item_gateway::GatewayServer;

#[derive(Debug, Parser)]
#[command(name = "item-gateway")]
#[command(about = "Category-routing HTTP gateway", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if cli.check {
        println!("configuration OK ({} categories)", config.registry.len());
        return Ok(());
    }

    logging::init_logging(&config.observability);

    tracing::info!("item-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    match &cli.config {
        Some(path) => tracing::info!(path = %path.display(), "Configuration loaded"),
        None => tracing::warn!("No --config given, using built-in defaults"),
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = GatewayServer::new(config);
    server.run(listener, shutdown.signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
