//! # Discovery Client
//!
//! The client half of the handshake: broadcast a discover, collect
//! proposals, accept one server and wait for its acknowledgment.

use crate::domain::{
    ClientError, DiscoveryConfig, MessageParams, ProtocolKey, ProtocolStep, ServerAccept,
    ServerProposal, SessionKey, SubscriptionAck, WrapError,
};
use crate::ports::{EnvelopeTransport, Subscription};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, trace};

/// Discover payload. Servers never read it; envelopes must not be empty.
const DISCOVER_PAYLOAD: &[u8] = b"{}";

/// A confirmed subscription.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerSubscription {
    /// Id of the acknowledging server (`0x` + hex).
    pub server: String,
    /// Session key the server issued.
    pub session_key: SessionKey,
}

/// Client side of notification server discovery.
pub struct DiscoveryClient {
    transport: Arc<dyn EnvelopeTransport>,
    protocol_key: ProtocolKey,
    config: DiscoveryConfig,
}

impl DiscoveryClient {
    /// Create a client publishing through `transport`.
    pub fn new(
        transport: Arc<dyn EnvelopeTransport>,
        protocol_key: ProtocolKey,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            transport,
            protocol_key,
            config,
        }
    }

    /// Broadcast a discover message and collect the distinct server ids
    /// proposed within `wait`, in arrival order.
    ///
    /// # Errors
    ///
    /// - `Anonymous` if the transport has no sender key
    /// - `Transport` / `Wrap` if the filter or the broadcast fails
    pub async fn discover(&self, wait: Duration) -> Result<Vec<String>, ClientError> {
        self.require_sender()?;

        let subscription = self
            .transport
            .install_filter(ProtocolStep::ProposeServer.topic(), &self.protocol_key)?;
        let handle = subscription.handle;

        let result = async {
            self.broadcast(ProtocolStep::Discover, DISCOVER_PAYLOAD.to_vec())
                .await?;
            Ok::<_, ClientError>(collect_proposals(subscription, wait).await)
        }
        .await;

        self.transport.remove_filter(handle);
        if let Ok(servers) = &result {
            debug!(proposals = servers.len(), "notification server discovery finished");
        }
        result
    }

    /// Accept `server_id` and wait up to `wait` for its acknowledgment.
    ///
    /// The ack filter is installed before the accept goes out so a fast
    /// reply cannot be missed. Acks from other servers are ignored.
    ///
    /// # Errors
    ///
    /// - `Anonymous` if the transport has no sender key
    /// - `Timeout` if no matching ack arrives in time
    /// - `MalformedAck` if the matching ack carries an undecodable key
    pub async fn accept(
        &self,
        server_id: &str,
        wait: Duration,
    ) -> Result<ServerSubscription, ClientError> {
        self.require_sender()?;

        let subscription = self
            .transport
            .install_filter(ProtocolStep::AckSubscription.topic(), &self.protocol_key)?;
        let handle = subscription.handle;

        let result = async {
            let payload = encode(&ServerAccept {
                server: server_id.to_string(),
            })?;
            self.broadcast(ProtocolStep::ServerAccepted, payload).await?;
            await_ack(subscription, server_id, wait).await
        }
        .await;

        self.transport.remove_filter(handle);
        if let Ok(subscription) = &result {
            debug!(server = %subscription.server, "notification server subscription confirmed");
        }
        result
    }

    fn require_sender(&self) -> Result<(), ClientError> {
        match self.transport.sender_key() {
            Some(_) => Ok(()),
            None => Err(ClientError::Anonymous),
        }
    }

    async fn broadcast(&self, step: ProtocolStep, payload: Vec<u8>) -> Result<(), ClientError> {
        let envelope = MessageParams {
            destination: None,
            key: self.protocol_key.clone(),
            topic: step.topic(),
            payload,
            ttl: self.config.ttl_secs,
            pow: self.config.minimum_pow,
            work_time: self.config.work_time_secs,
        }
        .wrap()?;
        self.transport.publish(envelope).await?;
        Ok(())
    }
}

async fn collect_proposals(mut subscription: Subscription, wait: Duration) -> Vec<String> {
    let deadline = Instant::now() + wait;
    let mut servers: Vec<String> = Vec::new();

    while let Ok(Some(msg)) = timeout_at(deadline, subscription.messages.recv()).await {
        match serde_json::from_slice::<ServerProposal>(&msg.payload) {
            Ok(proposal) if !servers.contains(&proposal.server) => servers.push(proposal.server),
            Ok(_) => {}
            Err(e) => trace!(error = %e, "ignoring malformed proposal"),
        }
    }
    servers
}

async fn await_ack(
    mut subscription: Subscription,
    server_id: &str,
    wait: Duration,
) -> Result<ServerSubscription, ClientError> {
    let deadline = Instant::now() + wait;

    while let Ok(Some(msg)) = timeout_at(deadline, subscription.messages.recv()).await {
        let ack: SubscriptionAck = match serde_json::from_slice(&msg.payload) {
            Ok(ack) => ack,
            Err(e) => {
                trace!(error = %e, "ignoring malformed ack");
                continue;
            }
        };
        if ack.server != server_id {
            continue;
        }
        let session_key =
            SessionKey::from_hex(&ack.key).map_err(|e| ClientError::MalformedAck(e.to_string()))?;
        return Ok(ServerSubscription {
            server: ack.server,
            session_key,
        });
    }

    Err(ClientError::Timeout {
        server: server_id.to_string(),
        waited_ms: wait.as_millis(),
    })
}

fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(payload).map_err(|e| ClientError::Wrap(WrapError::Encode(e)))
}
