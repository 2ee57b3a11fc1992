//! # Domain Value Objects
//!
//! Identities and key material exchanged by the protocol.
//!
//! ## Security
//!
//! [`ProtocolKey`] and [`SessionKey`] zeroize their bytes on drop and never
//! print them through `Debug`.

use super::errors::IdentityError;
use rand::RngCore;
use sha3::{Digest, Keccak256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Prefix used for every hex value on the wire.
pub const HEX_PREFIX: &str = "0x";

/// Default password the shared protocol key is derived from.
pub const DEFAULT_PROTOCOL_PASSWORD: &str = "NOTIFICATION_PROTOCOL_KEY";

/// Length of generated session keys in bytes.
pub const SESSION_KEY_LENGTH: usize = 32;

/// Stable public identifier of a notification server.
///
/// Stored as lowercase hex without the `0x` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIdentity(String);

impl NodeIdentity {
    /// Parse an identity from hex, with or without a `0x` prefix.
    pub fn parse(value: &str) -> Result<Self, IdentityError> {
        let raw = value.strip_prefix(HEX_PREFIX).unwrap_or(value);
        if raw.is_empty() {
            return Err(IdentityError::Empty);
        }
        if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdentityError::NotHex(value.to_string()));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Identity derived from a public key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        Self(key.to_hex())
    }

    /// Bare hex form.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Wire form: `0x` + hex. Accept messages must name exactly this value.
    pub fn server_id(&self) -> String {
        format!("{HEX_PREFIX}{}", self.0)
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.server_id())
    }
}

/// Public key of a transport participant, as authenticated by the transport.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Stable lowercase hex encoding (no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        let short = hex.get(..16).unwrap_or(&hex);
        write!(f, "PublicKey({short}..)")
    }
}

/// Symmetric key shared by every participant of the discovery protocol.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ProtocolKey([u8; 32]);

impl ProtocolKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the key from a shared password.
    pub fn from_password(password: &str) -> Self {
        let digest = Keccak256::digest(password.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Default for ProtocolKey {
    fn default() -> Self {
        Self::from_password(DEFAULT_PROTOCOL_PASSWORD)
    }
}

impl fmt::Debug for ProtocolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProtocolKey(***)")
    }
}

/// Secret issued to a client at registration.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey(Vec<u8>);

impl SessionKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; SESSION_KEY_LENGTH];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode a wire value (`0x`-prefixed or bare hex).
    pub fn from_hex(value: &str) -> Result<Self, hex::FromHexError> {
        let raw = value.strip_prefix(HEX_PREFIX).unwrap_or(value);
        hex::decode(raw).map(Self)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Wire form: `0x` + hex.
    pub fn to_wire(&self) -> String {
        format!("{HEX_PREFIX}{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(***)")
    }
}

/// Lifecycle state of the discovery service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ServiceState {
    /// No filters installed.
    #[default]
    Stopped,
    /// Filters being installed.
    Starting,
    /// Both filters installed, loops running.
    Running,
    /// Filters being removed.
    Stopping,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        f.write_str(name)
    }
}
