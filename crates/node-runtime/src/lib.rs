//! # Notification Node Library
//!
//! Exposes the runtime pieces of the `notification-node` binary for testing.
//!
//! - `container/` - Configuration loading and service wiring
//! - `runtime` - Start/stop orchestration and the demo client driver

#![warn(missing_docs)]

pub mod container;
pub mod runtime;

pub use container::{RuntimeConfig, ServiceContainer};
pub use runtime::NodeRuntime;
