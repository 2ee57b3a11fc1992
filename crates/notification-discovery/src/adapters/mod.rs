//! # Adapters Layer (Hexagonal Architecture)
//!
//! Concrete implementations of the outbound ports:
//!
//! - `InMemoryNetwork` / `NetworkEndpoint` - process-local envelope transport
//! - `InMemorySessionRegistry` - thread-safe keystore
//! - `StaticConfigProvider` / `TomlConfigProvider` - configuration sources

/// Configuration providers
pub mod config;
/// In-memory envelope transport
pub mod bus;
/// Session keystore
pub mod registry;

pub use bus::{InMemoryNetwork, NetworkEndpoint, DEFAULT_FILTER_CAPACITY};
pub use config::{ConfigError, StaticConfigProvider, TomlConfigProvider};
pub use registry::{InMemorySessionRegistry, SessionRecord};
