//! Configuration for the discovery service and the session registry.

use serde::Deserialize;

/// Outbound message policy and delivery sizing for the discovery service.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscoveryConfig {
    /// Time-to-live of outbound messages in seconds.
    pub ttl_secs: u32,
    /// Minimum proof-of-work target of outbound messages.
    pub minimum_pow: f64,
    /// Per-message proof-of-work time budget in seconds.
    pub work_time_secs: u32,
    /// Capacity of each filter's delivery channel.
    pub channel_capacity: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 50,
            minimum_pow: 0.2,
            work_time_secs: 5,
            channel_capacity: 1024,
        }
    }
}

impl DiscoveryConfig {
    /// Config with a cheap PoW target and small channels.
    pub fn for_testing() -> Self {
        Self {
            ttl_secs: 10,
            minimum_pow: 0.001,
            work_time_secs: 1,
            channel_capacity: 64,
        }
    }
}

/// How the registry treats a client that already holds a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// Mint a new key on every registration, replacing the old one.
    #[default]
    AlwaysFresh,
    /// Hand back the client's active key if it has one.
    ReuseActive,
}

/// Session registry limits and policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Duplicate-registration policy.
    pub policy: RegistrationPolicy,
    /// Maximum number of concurrently held sessions.
    pub max_sessions: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            policy: RegistrationPolicy::AlwaysFresh,
            max_sessions: 10_000,
        }
    }
}

/// Identity and logging settings of the hosting node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSettings {
    /// Hex node identity; `None` derives one from the node's transport key.
    pub identity: Option<String>,
    /// Password the shared protocol key is derived from.
    pub protocol_password: String,
    /// Default log filter directive.
    pub log_level: String,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            identity: None,
            protocol_password: super::value_objects::DEFAULT_PROTOCOL_PASSWORD.to_string(),
            log_level: "info".to_string(),
        }
    }
}
