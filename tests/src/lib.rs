//! # Notification Discovery Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Servers and clients on a shared in-memory network
//! └── integration/      # Cross-component scenarios
//!     ├── handshake.rs  # Full discover / accept / ack flows
//!     ├── isolation.rs  # Multi-server disambiguation and key separation
//!     └── lifecycle.rs  # Start / stop behavior seen from the network
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p nd-tests
//!
//! # By category
//! cargo test -p nd-tests integration::isolation::
//!
//! # Benchmarks
//! cargo bench -p nd-tests
//! ```

pub mod fixtures;
pub mod integration;
