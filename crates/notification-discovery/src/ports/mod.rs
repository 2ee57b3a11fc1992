//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the API the discovery service exposes
//! - **Driven Ports (Outbound):** the transport, registry and config source
//!   the host supplies

pub mod inbound;
pub mod outbound;

pub use inbound::DiscoveryApi;
pub use outbound::{ConfigProvider, EnvelopeTransport, SessionRegistry, Subscription};
