//! # Domain Entities
//!
//! Messages, envelopes and session descriptors handled by the protocol.

use super::errors::WrapError;
use super::topic::Topic;
use super::value_objects::{ProtocolKey, PublicKey};
use serde::{Deserialize, Serialize};

/// Largest payload an envelope may carry (1 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Opaque token identifying an installed filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterHandle(u64);

impl FilterHandle {
    /// Wrap a transport-assigned id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Transport-assigned id.
    pub const fn id(&self) -> u64 {
        self.0
    }
}

/// A message delivered by the transport to an installed filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Authenticated sender key, if the envelope was signed.
    pub src: Option<PublicKey>,
    /// Decrypted payload bytes.
    pub payload: Vec<u8>,
    /// Topic the envelope was published under.
    pub topic: Topic,
}

/// Outbound message parameters, before wrapping.
#[derive(Clone, Debug)]
pub struct MessageParams {
    /// Recipient key; `None` broadcasts to every matching filter.
    pub destination: Option<PublicKey>,
    /// Symmetric key the envelope is keyed with.
    pub key: ProtocolKey,
    /// Routing topic.
    pub topic: Topic,
    /// Payload bytes.
    pub payload: Vec<u8>,
    /// Time-to-live in seconds.
    pub ttl: u32,
    /// Minimum proof-of-work target.
    pub pow: f64,
    /// Time budget for proof-of-work in seconds.
    pub work_time: u32,
}

impl MessageParams {
    /// Validate the parameters and seal them into an envelope.
    pub fn wrap(self) -> Result<Envelope, WrapError> {
        if self.payload.is_empty() {
            return Err(WrapError::EmptyPayload);
        }
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(WrapError::PayloadTooLarge {
                size: self.payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        if self.ttl == 0 {
            return Err(WrapError::ZeroTtl);
        }
        if !self.pow.is_finite() || self.pow < 0.0 {
            return Err(WrapError::InvalidPow(self.pow));
        }
        if self.work_time == 0 {
            return Err(WrapError::ZeroWorkTime);
        }

        Ok(Envelope {
            destination: self.destination,
            key: self.key,
            topic: self.topic,
            payload: self.payload,
            ttl: self.ttl,
            pow: self.pow,
            work_time: self.work_time,
        })
    }
}

/// A sealed message ready for publishing.
///
/// Only constructible through [`MessageParams::wrap`].
#[derive(Clone, Debug)]
pub struct Envelope {
    destination: Option<PublicKey>,
    key: ProtocolKey,
    topic: Topic,
    payload: Vec<u8>,
    ttl: u32,
    pow: f64,
    work_time: u32,
}

impl Envelope {
    /// Recipient key, if addressed.
    pub fn destination(&self) -> Option<&PublicKey> {
        self.destination.as_ref()
    }

    /// Symmetric key.
    pub fn key(&self) -> &ProtocolKey {
        &self.key
    }

    /// Routing topic.
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Time-to-live in seconds.
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Proof-of-work target.
    pub fn pow(&self) -> f64 {
        self.pow
    }

    /// Proof-of-work time budget in seconds.
    pub fn work_time(&self) -> u32 {
        self.work_time
    }
}

/// Descriptor handed to the session registry for an accepted client.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClientSession {
    /// Client public key, hex-encoded.
    pub client_key: String,
}

impl ClientSession {
    /// Descriptor for the sender of an accept message.
    pub fn from_public_key(key: &PublicKey) -> Self {
        Self {
            client_key: key.to_hex(),
        }
    }
}

// =============================================================================
// WIRE PAYLOADS
// =============================================================================

/// Propose payload: `{"server": "0x<id>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProposal {
    /// Proposing server id.
    pub server: String,
}

/// Accept payload: `{"server": "0x<id>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAccept {
    /// Selected server id.
    pub server: String,
}

/// Ack payload: `{"server": "0x<id>", "key": "0x<session key>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionAck {
    /// Acknowledging server id.
    pub server: String,
    /// Issued session key, hex with `0x` prefix.
    pub key: String,
}
