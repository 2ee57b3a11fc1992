//! # Integration Scenarios
//!
//! Servers and clients exchanging real envelopes over an in-memory network.

pub mod handshake;
pub mod isolation;
pub mod lifecycle;
