//! # Notification Server Discovery
//!
//! Lets clients on a topic-routed envelope network find a notification
//! server, pick one, and receive a per-client session key from it.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Protocol
//!
//! Every message is keyed with one symmetric protocol key derived from a
//! well-known password, and routed by a 4-byte topic derived from the step
//! name:
//!
//! | Step | Direction | Payload |
//! |------|-----------|---------|
//! | `DISCOVER_NOTIFICATION_SERVER` | client → all | ignored |
//! | `PROPOSE_NOTIFICATION_SERVER` | server → client | `{"server":"0x.."}` |
//! | `ACCEPT_NOTIFICATION_SERVER` | client → all | `{"server":"0x.."}` |
//! | `ACK_NOTIFICATION_SERVER_SUBSCRIPTION` | server → client | `{"server":"0x..","key":"0x.."}` |
//!
//! ## Module Structure
//!
//! ```text
//! notification-discovery/
//! ├── domain/     # Topics, keys, envelopes, errors, config
//! ├── ports/      # DiscoveryApi, EnvelopeTransport, SessionRegistry
//! ├── service/    # DiscoveryService state machine and handlers
//! ├── adapters/   # In-memory network, keystore, TOML config
//! └── client      # Client side of the handshake
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod client;
pub mod domain;
pub mod ports;
pub mod service;

/// Test doubles for the outbound ports.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports
pub use adapters::{
    ConfigError, InMemoryNetwork, InMemorySessionRegistry, NetworkEndpoint, StaticConfigProvider,
    TomlConfigProvider,
};
pub use client::{DiscoveryClient, ServerSubscription};
pub use domain::{
    ClientError, ClientSession, DiscoveryConfig, DiscoveryError, Envelope, FilterHandle,
    IdentityError, MessageParams, NodeIdentity, NodeSettings, ProtocolKey, ProtocolStep,
    PublicKey, ReceivedMessage, RegistrationPolicy, RegistryConfig, RegistryError, ServiceState,
    SessionKey, Topic, TransportError, WrapError, DEFAULT_PROTOCOL_PASSWORD,
};
pub use ports::{ConfigProvider, DiscoveryApi, EnvelopeTransport, SessionRegistry, Subscription};
pub use service::{DiscoveryService, NotificationServer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
