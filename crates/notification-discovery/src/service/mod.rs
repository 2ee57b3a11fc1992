//! # Discovery Service
//!
//! The advertise / accept / acknowledge state machine.
//!
//! ```text
//! client ──Discover──────────→ every server
//! client ←─ProposeServer──────  each server   {"server": "0x<id>"}
//! client ──ServerAccepted────→ every server   {"server": "0x<id>"}
//!                               named server registers the client
//! client ←─AckSubscription────  named server  {"server": "0x<id>", "key": "0x<k>"}
//! ```
//!
//! ## Concurrency
//!
//! One processing loop per filter, one task per delivered message, with at
//! most `channel_capacity` handler tasks in flight per loop. Handlers
//! share only the read-only identity and protocol key; the session registry
//! is the single shared mutable resource and does its own locking.

// Semantic submodules
mod api;
mod core;
mod handlers;
mod lifecycle;
mod processor;
mod server;

// Re-export public API
pub use core::DiscoveryService;
pub use server::NotificationServer;
