//! # Service Container
//!
//! Configuration and the wired set of services a node runs.

pub mod config;
pub mod services;

pub use config::{RuntimeConfig, ENV_CONFIG, ENV_DEMO_CLIENTS, ENV_IDENTITY, ENV_LOG};
pub use services::ServiceContainer;
