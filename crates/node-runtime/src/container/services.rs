//! # Service Wiring
//!
//! Builds the in-memory network, the session registry and the discovery
//! service for one notification server.

use super::config::RuntimeConfig;
use anyhow::{Context, Result};
use notification_discovery::{
    DiscoveryClient, DiscoveryService, InMemoryNetwork, InMemorySessionRegistry, NodeIdentity,
    NotificationServer, ProtocolKey, PublicKey,
};
use rand::RngCore;
use std::sync::Arc;
use tracing::info;

/// Length of generated endpoint keys in bytes.
const ENDPOINT_KEY_LENGTH: usize = 32;

/// Every service a node runs, wired together.
pub struct ServiceContainer {
    /// Configuration the container was built from.
    pub config: RuntimeConfig,
    /// Envelope network the server (and demo clients) attach to.
    pub network: InMemoryNetwork,
    /// Session keystore.
    pub registry: Arc<InMemorySessionRegistry>,
    /// Notification server discovery service.
    pub discovery: Arc<DiscoveryService>,
    protocol_key: ProtocolKey,
}

impl ServiceContainer {
    /// Wire all services for `config`.
    ///
    /// Without a configured identity the server is named after its freshly
    /// generated endpoint key.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let network = InMemoryNetwork::with_capacity(config.discovery.channel_capacity);
        let server_key = random_endpoint_key();

        let identity = match &config.node.identity {
            Some(value) => NodeIdentity::parse(value)
                .with_context(|| format!("Invalid node identity {value:?}"))?,
            None => NodeIdentity::from_public_key(&server_key),
        };
        let protocol_key = ProtocolKey::from_password(&config.node.protocol_password);

        let registry = Arc::new(InMemorySessionRegistry::new(config.registry.clone()));
        let server = NotificationServer::new(
            identity,
            protocol_key.clone(),
            config.discovery.clone(),
            Arc::new(network.endpoint(server_key)),
            registry.clone(),
        );
        let discovery = Arc::new(DiscoveryService::new(Arc::new(server)));

        info!(
            server = %discovery.identity(),
            policy = ?config.registry.policy,
            "Services wired"
        );

        Ok(Self {
            config,
            network,
            registry,
            discovery,
            protocol_key,
        })
    }

    /// A client attached to this node's network under a fresh key.
    pub fn new_client(&self) -> DiscoveryClient {
        DiscoveryClient::new(
            Arc::new(self.network.endpoint(random_endpoint_key())),
            self.protocol_key.clone(),
            self.config.discovery.clone(),
        )
    }
}

fn random_endpoint_key() -> PublicKey {
    let mut bytes = vec![0u8; ENDPOINT_KEY_LENGTH];
    rand::thread_rng().fill_bytes(&mut bytes);
    PublicKey::from_bytes(bytes)
}
