use crate::domain::{
    ClientSession, DiscoveryConfig, DiscoveryError, FilterHandle, MessageParams, NodeIdentity,
    ProtocolKey, ProtocolStep, PublicKey, SessionKey,
};
use crate::ports::{EnvelopeTransport, SessionRegistry, Subscription};
use std::sync::Arc;

/// Hosting server context shared by every discovery handler.
///
/// Owns the node identity and the shared protocol key as plain fields, so
/// several independent servers can live in one process.
pub struct NotificationServer {
    identity: NodeIdentity,
    protocol_key: ProtocolKey,
    config: DiscoveryConfig,
    transport: Arc<dyn EnvelopeTransport>,
    registry: Arc<dyn SessionRegistry>,
}

impl NotificationServer {
    /// Create a server context.
    ///
    /// # Arguments
    ///
    /// * `identity` - Our own server identity
    /// * `protocol_key` - Symmetric key shared by all protocol participants
    /// * `config` - Outbound message policy
    /// * `transport` - Envelope transport
    /// * `registry` - Session keystore
    pub fn new(
        identity: NodeIdentity,
        protocol_key: ProtocolKey,
        config: DiscoveryConfig,
        transport: Arc<dyn EnvelopeTransport>,
        registry: Arc<dyn SessionRegistry>,
    ) -> Self {
        Self {
            identity,
            protocol_key,
            config,
            transport,
            registry,
        }
    }

    /// Our server identity.
    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    /// Shared protocol key.
    pub fn protocol_key(&self) -> &ProtocolKey {
        &self.protocol_key
    }

    /// Outbound message policy.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Install a filter for a protocol step under the shared key.
    pub fn install_topic_filter(&self, step: ProtocolStep) -> Result<Subscription, DiscoveryError> {
        self.transport
            .install_filter(step.topic(), &self.protocol_key)
            .map_err(|source| DiscoveryError::FilterInstall { step, source })
    }

    /// Remove a previously installed filter.
    pub fn remove_topic_filter(&self, handle: FilterHandle) -> bool {
        self.transport.remove_filter(handle)
    }

    /// Register a client session. Registry errors propagate unchanged.
    pub async fn register_client_session(
        &self,
        session: ClientSession,
    ) -> Result<SessionKey, DiscoveryError> {
        Ok(self.registry.register_session(session).await?)
    }

    /// Parameters for a reply to `destination` under `step`'s topic.
    pub(crate) fn reply_params(
        &self,
        destination: PublicKey,
        step: ProtocolStep,
        payload: Vec<u8>,
    ) -> MessageParams {
        MessageParams {
            destination: Some(destination),
            key: self.protocol_key.clone(),
            topic: step.topic(),
            payload,
            ttl: self.config.ttl_secs,
            pow: self.config.minimum_pow,
            work_time: self.config.work_time_secs,
        }
    }

    /// Wrap and publish, attaching `context` to any failure.
    pub async fn publish(
        &self,
        params: MessageParams,
        context: &'static str,
    ) -> Result<(), DiscoveryError> {
        let envelope = params
            .wrap()
            .map_err(|source| DiscoveryError::Wrap { context, source })?;

        self.transport
            .publish(envelope)
            .await
            .map_err(|source| DiscoveryError::Publish { context, source })
    }
}
