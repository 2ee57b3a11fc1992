//! # Notification Node
//!
//! Hosts one notification server on an in-memory envelope network.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (`NOTIFY_CONFIG` file, then env overrides)
//! 2. Initialize logging (`RUST_LOG` wins over the configured level)
//! 3. Wire services and start discovery
//! 4. Run `NOTIFY_DEMO_CLIENTS` simulated clients
//! 5. Wait for Ctrl+C, then stop

use anyhow::{Context, Result};
use notification_node::{NodeRuntime, RuntimeConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log filter {level:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first: it carries the log level
    let config = RuntimeConfig::from_env()?;
    init_logging(&config.node.log_level)?;
    config.log_loaded();

    let demo_clients = config.demo_clients;
    let runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    if demo_clients > 0 {
        runtime.run_demo_clients(demo_clients).await;
    }

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await
}
