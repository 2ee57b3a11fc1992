//! # Protocol Topics
//!
//! Topics are the transport's routing keys. Each protocol step has a fixed
//! human-readable name; its topic is the first [`TOPIC_LENGTH`] bytes of the
//! Keccak-256 digest of that name.
//!
//! There is no negotiation step: every participant derives the same four
//! topics from the same names.

use sha3::{Digest, Keccak256};
use std::fmt;

/// Width of a transport topic in bytes.
pub const TOPIC_LENGTH: usize = 4;

/// Fixed-size routing key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic([u8; TOPIC_LENGTH]);

impl Topic {
    /// Derive a topic from a protocol-step name.
    pub fn derive(name: &str) -> Self {
        let digest = Keccak256::digest(name.as_bytes());
        let mut bytes = [0u8; TOPIC_LENGTH];
        bytes.copy_from_slice(&digest[..TOPIC_LENGTH]);
        Self(bytes)
    }

    /// Wrap raw topic bytes.
    pub const fn from_bytes(bytes: [u8; TOPIC_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw topic bytes.
    pub fn as_bytes(&self) -> &[u8; TOPIC_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// The four steps of the rendezvous protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolStep {
    /// Client broadcast looking for servers.
    Discover,
    /// Server offer addressed to a discovering client.
    ProposeServer,
    /// Client selection of one server.
    ServerAccepted,
    /// Server confirmation carrying the session key.
    AckSubscription,
}

impl ProtocolStep {
    /// All steps, in protocol order.
    pub const ALL: [ProtocolStep; 4] = [
        ProtocolStep::Discover,
        ProtocolStep::ProposeServer,
        ProtocolStep::ServerAccepted,
        ProtocolStep::AckSubscription,
    ];

    /// Wire name of the step.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Discover => "DISCOVER_NOTIFICATION_SERVER",
            Self::ProposeServer => "PROPOSE_NOTIFICATION_SERVER",
            Self::ServerAccepted => "ACCEPT_NOTIFICATION_SERVER",
            Self::AckSubscription => "ACK_NOTIFICATION_SERVER_SUBSCRIPTION",
        }
    }

    /// Topic for this step.
    pub fn topic(&self) -> Topic {
        Topic::derive(self.name())
    }
}

impl fmt::Display for ProtocolStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_derivation_is_deterministic() {
        let first = Topic::derive("DISCOVER_NOTIFICATION_SERVER");
        let second = Topic::derive("DISCOVER_NOTIFICATION_SERVER");
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(first, ProtocolStep::Discover.topic());
    }

    #[test]
    fn test_topic_is_keccak_prefix() {
        let digest = Keccak256::digest(b"PROPOSE_NOTIFICATION_SERVER");
        let topic = ProtocolStep::ProposeServer.topic();
        assert_eq!(&topic.as_bytes()[..], &digest[..TOPIC_LENGTH]);
    }

    #[test]
    fn test_step_topics_are_distinct() {
        let topics: HashSet<Topic> = ProtocolStep::ALL.iter().map(|s| s.topic()).collect();
        assert_eq!(topics.len(), ProtocolStep::ALL.len());
    }

    #[test]
    fn test_topic_display_is_prefixed_hex() {
        let topic = Topic::from_bytes([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(topic.to_string(), "0xdeadbeef");
    }
}
