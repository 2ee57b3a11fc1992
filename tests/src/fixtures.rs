//! Shared fixtures: notification servers and clients attached to one
//! in-memory network.

use notification_discovery::{
    DiscoveryClient, DiscoveryConfig, DiscoveryService, InMemoryNetwork, InMemorySessionRegistry,
    NodeIdentity, NotificationServer, ProtocolKey, PublicKey, RegistrationPolicy, RegistryConfig,
};
use std::sync::Arc;
use std::time::Duration;

/// Default wait for proposals and acks in scenarios.
pub const WAIT: Duration = Duration::from_millis(300);

/// Endpoint key with every byte set to `val`.
pub fn endpoint_key(val: u8) -> PublicKey {
    PublicKey::from_bytes(vec![val; 16])
}

/// A notification server and its keystore.
pub struct ServerNode {
    /// Endpoint key the server publishes with.
    pub key: PublicKey,
    /// Discovery service (not started).
    pub service: DiscoveryService,
    /// Session keystore.
    pub registry: Arc<InMemorySessionRegistry>,
}

impl ServerNode {
    /// Server id as carried in payloads.
    pub fn server_id(&self) -> String {
        self.service.identity().server_id()
    }
}

/// Build a server named after its endpoint key.
pub fn server_node(network: &InMemoryNetwork, val: u8, policy: RegistrationPolicy) -> ServerNode {
    server_node_with_key(network, val, policy, ProtocolKey::default())
}

/// Build a server using a non-default protocol key.
pub fn server_node_with_key(
    network: &InMemoryNetwork,
    val: u8,
    policy: RegistrationPolicy,
    protocol_key: ProtocolKey,
) -> ServerNode {
    let key = endpoint_key(val);
    let registry = Arc::new(InMemorySessionRegistry::new(RegistryConfig {
        policy,
        ..RegistryConfig::default()
    }));
    let server = NotificationServer::new(
        NodeIdentity::from_public_key(&key),
        protocol_key,
        DiscoveryConfig::for_testing(),
        Arc::new(network.endpoint(key.clone())),
        registry.clone(),
    );
    ServerNode {
        key,
        service: DiscoveryService::new(Arc::new(server)),
        registry,
    }
}

/// Build a client with the default protocol key.
pub fn client(network: &InMemoryNetwork, val: u8) -> DiscoveryClient {
    DiscoveryClient::new(
        Arc::new(network.endpoint(endpoint_key(val))),
        ProtocolKey::default(),
        DiscoveryConfig::for_testing(),
    )
}
