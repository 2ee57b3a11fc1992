//! Per-message handlers for the Discover and ServerAccepted topics.
//!
//! Both handlers are stateless apart from the registry call and may run
//! concurrently for any number of messages.

use super::server::NotificationServer;
use crate::domain::{
    ClientSession, DiscoveryError, ProtocolStep, ReceivedMessage, ServerAccept, ServerProposal,
    SubscriptionAck, WrapError,
};
use serde::Serialize;
use tracing::{debug, trace};

pub(crate) const PROPOSAL_CONTEXT: &str = "server proposal message";
pub(crate) const ACK_CONTEXT: &str = "subscription ack message";

/// Offer this node as notification server to the sender of a discover message.
pub(crate) async fn process_discovery_request(
    server: &NotificationServer,
    msg: &ReceivedMessage,
) -> Result<(), DiscoveryError> {
    let dst = msg.src.clone().ok_or(DiscoveryError::MissingSender)?;

    let payload = encode(
        &ServerProposal {
            server: server.identity().server_id(),
        },
        PROPOSAL_CONTEXT,
    )?;
    let params = server.reply_params(dst, ProtocolStep::ProposeServer, payload);
    let topic = params.topic;
    let dst = params.destination.clone();

    server.publish(params, PROPOSAL_CONTEXT).await?;

    debug!(dst = ?dst, topic = %topic, "server proposal message sent");
    Ok(())
}

/// Register the sender of an accept message addressed to this node and
/// confirm the subscription with its session key.
pub(crate) async fn process_server_accepted_request(
    server: &NotificationServer,
    msg: &ReceivedMessage,
) -> Result<(), DiscoveryError> {
    let accept: ServerAccept = serde_json::from_slice(&msg.payload)?;

    let src = msg.src.as_ref().ok_or(DiscoveryError::MissingSender)?;

    let server_id = server.identity().server_id();
    if accept.server != server_id {
        trace!(requested = %accept.server, "accept addressed to another server, ignoring");
        return Ok(());
    }

    let session_key = server
        .register_client_session(ClientSession::from_public_key(src))
        .await?;

    let payload = encode(
        &SubscriptionAck {
            server: server_id,
            key: session_key.to_wire(),
        },
        ACK_CONTEXT,
    )?;
    drop(session_key);

    let params = server.reply_params(src.clone(), ProtocolStep::AckSubscription, payload);
    let topic = params.topic;

    server.publish(params, ACK_CONTEXT).await?;

    debug!(dst = ?src, topic = %topic, "server confirms client subscription");
    Ok(())
}

fn encode<T: Serialize>(payload: &T, context: &'static str) -> Result<Vec<u8>, DiscoveryError> {
    serde_json::to_vec(payload).map_err(|e| DiscoveryError::Wrap {
        context,
        source: WrapError::Encode(e),
    })
}
