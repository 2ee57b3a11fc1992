//! # Driving Ports (Inbound API)
//!
//! What the hosting node can ask of the discovery service.

use crate::domain::{DiscoveryError, ReceivedMessage, ServiceState};
use async_trait::async_trait;

/// Lifecycle and per-message API of the discovery service.
///
/// The message handlers are exposed so a host with its own delivery loop can
/// drive them directly.
#[async_trait]
pub trait DiscoveryApi: Send + Sync {
    /// Install the Discover and ServerAccepted filters and start processing.
    ///
    /// Either both filters are installed or neither is.
    async fn start(&self) -> Result<(), DiscoveryError>;

    /// Remove both filters. In-flight handlers are not awaited.
    async fn stop(&self) -> Result<(), DiscoveryError>;

    /// Current lifecycle state.
    fn state(&self) -> ServiceState;

    /// Answer a discover broadcast with a proposal.
    async fn process_discovery_request(&self, msg: &ReceivedMessage) -> Result<(), DiscoveryError>;

    /// Register the sender of an accept naming this server and acknowledge it.
    async fn process_server_accepted_request(
        &self,
        msg: &ReceivedMessage,
    ) -> Result<(), DiscoveryError>;
}
