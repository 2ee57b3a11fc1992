//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the hosting node must provide: the envelope transport, the
//! session registry and a configuration source.

use crate::domain::{
    ClientSession, DiscoveryConfig, Envelope, FilterHandle, NodeSettings, ProtocolKey,
    PublicKey, ReceivedMessage, RegistryConfig, RegistryError, SessionKey, Topic, TransportError,
};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// An installed filter: its handle plus the channel its deliveries arrive on.
///
/// The channel closes once the transport drops the filter, which is how
/// processing loops learn that `remove_filter` was called.
#[derive(Debug)]
pub struct Subscription {
    /// Handle to pass to `remove_filter`.
    pub handle: FilterHandle,
    /// Deliveries matching the filter.
    pub messages: mpsc::Receiver<ReceivedMessage>,
}

/// Topic-addressed envelope transport.
///
/// Authenticity (sender key) and confidentiality (keying) are the transport's
/// concern; it gives no ordering or delivery guarantees.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; handlers publish concurrently.
#[async_trait]
pub trait EnvelopeTransport: Send + Sync {
    /// Install a filter for `topic` keyed with `key`.
    fn install_filter(&self, topic: Topic, key: &ProtocolKey)
        -> Result<Subscription, TransportError>;

    /// Remove a filter. Returns `false` if the handle was unknown.
    fn remove_filter(&self, handle: FilterHandle) -> bool;

    /// Publish a wrapped envelope.
    async fn publish(&self, envelope: Envelope) -> Result<(), TransportError>;

    /// Key the transport stamps on outgoing envelopes, if any.
    ///
    /// Anonymous transports can broadcast but never receive addressed replies.
    fn sender_key(&self) -> Option<PublicKey> {
        None
    }
}

/// Keystore mapping accepted clients to session keys.
///
/// Must be internally concurrency-safe: the discovery service calls it from
/// many handler tasks at once without external locking.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Register a client and return its session key.
    async fn register_session(&self, session: ClientSession) -> Result<SessionKey, RegistryError>;
}

/// Source of node configuration.
pub trait ConfigProvider: Send + Sync {
    /// Node identity and logging settings.
    fn node_settings(&self) -> NodeSettings;

    /// Outbound message policy.
    fn discovery_config(&self) -> DiscoveryConfig;

    /// Registry policy and limits.
    fn registry_config(&self) -> RegistryConfig;
}
