//! # Domain Errors
//!
//! Error types for the discovery protocol, the transport port and the
//! session registry.
//!
//! Only [`DiscoveryError::FilterInstall`] is fatal at service level (it
//! aborts `start()` after rollback). Every other variant is local to the
//! handling of a single message and is logged by the processor loop.

use super::topic::ProtocolStep;
use super::value_objects::ServiceState;
use thiserror::Error;

/// Errors raised by the discovery service.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A topic filter could not be installed during `start()`.
    #[error("failed installing filter for {step}: {source}")]
    FilterInstall {
        /// Protocol step whose filter failed.
        step: ProtocolStep,
        /// Transport-reported cause.
        source: TransportError,
    },

    /// The received message carries no sender key, so no reply can be addressed.
    #[error("message 'from' field is required")]
    MissingSender,

    /// The payload is not a valid `{"server": "<string>"}` object.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The session registry refused the registration.
    #[error(transparent)]
    Registration(#[from] RegistryError),

    /// The transport failed to send an outbound message.
    #[error("failed to send {context}: {source}")]
    Publish {
        /// Which outbound message was being sent.
        context: &'static str,
        /// Transport-reported cause.
        source: TransportError,
    },

    /// The outbound message could not be wrapped into an envelope.
    #[error("failed to wrap {context}: {source}")]
    Wrap {
        /// Which outbound message was being wrapped.
        context: &'static str,
        /// Envelope construction cause.
        source: WrapError,
    },

    /// `start()` was called while the service was not stopped.
    #[error("discovery service is already {0}")]
    AlreadyStarted(ServiceState),

    /// A message arrived on a client-bound topic the server never handles.
    #[error("no server handler for {0} messages")]
    UnhandledStep(ProtocolStep),
}

/// Errors from the envelope transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The transport refused to install a filter.
    #[error("filter rejected: {0}")]
    FilterRejected(String),

    /// The transport has been shut down.
    #[error("transport closed")]
    Closed,

    /// The envelope could not be sent.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Errors from envelope construction.
#[derive(Debug, Error)]
pub enum WrapError {
    /// Envelopes must carry a payload.
    #[error("payload is empty")]
    EmptyPayload,

    /// Payload exceeds the transport's message size limit.
    #[error("payload of {size} bytes exceeds limit of {max} bytes")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Envelopes with zero TTL expire immediately.
    #[error("ttl must be non-zero")]
    ZeroTtl,

    /// PoW target must be a finite, non-negative number.
    #[error("invalid proof-of-work target: {0}")]
    InvalidPow(f64),

    /// No time budget for proof-of-work computation.
    #[error("work time must be non-zero")]
    ZeroWorkTime,

    /// The payload could not be serialized.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from the session registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry holds the maximum number of sessions.
    #[error("session capacity reached ({max} sessions)")]
    CapacityReached {
        /// Configured maximum.
        max: usize,
    },

    /// The client descriptor carries no usable key.
    #[error("invalid client key: {0}")]
    InvalidClient(String),
}

/// Errors parsing a node identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Identity string is empty (after stripping an optional `0x`).
    #[error("node identity is empty")]
    Empty,

    /// Identity contains a non-hex character.
    #[error("node identity is not hex: {0:?}")]
    NotHex(String),
}

/// Errors on the client side of the protocol.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client transport has no sender key, so servers cannot reply.
    #[error("client transport has no identity")]
    Anonymous,

    /// Filter installation or publish failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The outbound message could not be wrapped.
    #[error(transparent)]
    Wrap(#[from] WrapError),

    /// No acknowledgment arrived in time.
    #[error("no acknowledgment from {server} within {waited_ms} ms")]
    Timeout {
        /// Server the client accepted.
        server: String,
        /// How long the client waited.
        waited_ms: u128,
    },

    /// The acknowledgment payload was unusable.
    #[error("malformed acknowledgment: {0}")]
    MalformedAck(String),
}
