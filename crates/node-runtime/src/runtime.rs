//! # Node Runtime
//!
//! Starts and stops the discovery service and optionally drives simulated
//! clients through the full handshake.
//!
//! ## Startup Sequence
//!
//! 1. Wire services from configuration
//! 2. Install the discovery filters
//! 3. Run demo clients (if configured)
//! 4. Signal ready

use crate::container::{RuntimeConfig, ServiceContainer};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

/// How long a demo client waits for proposals and for its ack.
const DEMO_WAIT: Duration = Duration::from_millis(500);

/// The node runtime hosting one notification server.
pub struct NodeRuntime {
    container: ServiceContainer,
}

impl NodeRuntime {
    /// Create a runtime with all services wired but not started.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        info!("Creating notification node runtime");
        let container = ServiceContainer::new(config)?;
        Ok(Self { container })
    }

    /// Start the discovery service.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Notification Node v{}", notification_discovery::VERSION);
        info!("===========================================");

        self.container
            .discovery
            .start()
            .await
            .context("Failed to start discovery service")?;

        info!(
            server = %self.container.discovery.identity(),
            "Notification server is discoverable"
        );
        Ok(())
    }

    /// Run `count` simulated clients through discover / accept / ack.
    ///
    /// Each client accepts the first server it discovers. Returns how many
    /// clients obtained a session key; failures are logged, not returned.
    pub async fn run_demo_clients(&self, count: usize) -> usize {
        let mut subscribed = 0;
        for n in 1..=count {
            let client = self.container.new_client();

            let servers = match client.discover(DEMO_WAIT).await {
                Ok(servers) => servers,
                Err(e) => {
                    warn!(client = n, error = %e, "Demo client discovery failed");
                    continue;
                }
            };
            let Some(server) = servers.first() else {
                warn!(client = n, "Demo client found no notification server");
                continue;
            };

            match client.accept(server, DEMO_WAIT).await {
                Ok(subscription) => {
                    subscribed += 1;
                    info!(client = n, server = %subscription.server, "Demo client subscribed");
                }
                Err(e) => warn!(client = n, error = %e, "Demo client accept failed"),
            }
        }

        info!(
            subscribed,
            requested = count,
            sessions = self.container.registry.session_count(),
            "Demo clients finished"
        );
        subscribed
    }

    /// Stop the discovery service and close the network.
    ///
    /// ## Shutdown Sequence
    ///
    /// 1. Remove the discovery filters
    /// 2. Close the network so stray publishes fail fast
    pub async fn shutdown(&self) -> Result<()> {
        info!("Initiating graceful shutdown...");

        self.container
            .discovery
            .stop()
            .await
            .context("Failed to stop discovery service")?;
        self.container.network.shutdown();

        info!(
            envelopes = self.container.network.envelopes_published(),
            "Shutdown complete"
        );
        Ok(())
    }

    /// The wired services.
    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }
}
