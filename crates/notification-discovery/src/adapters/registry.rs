//! In-memory session registry.
//!
//! Implements the [`SessionRegistry`] port. The duplicate-registration
//! behavior is set by [`RegistrationPolicy`]:
//!
//! - `AlwaysFresh`: every accept mints a new key (replacing the old one)
//! - `ReuseActive`: a client with an active session gets the same key back,
//!   so redelivered accept messages are idempotent

use crate::domain::{ClientSession, RegistrationPolicy, RegistryConfig, RegistryError, SessionKey};
use crate::ports::SessionRegistry;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// A client's stored session.
#[derive(Clone, Debug)]
pub struct SessionRecord {
    /// Current session key.
    pub key: SessionKey,
    /// How many times the client has registered.
    pub registrations: u32,
}

/// Thread-safe in-memory keystore.
pub struct InMemorySessionRegistry {
    config: RegistryConfig,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionRegistry {
    /// Create an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registry policy and limits.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Active key for a client, if any.
    pub fn session_key(&self, client_key: &str) -> Option<SessionKey> {
        self.sessions.read().get(client_key).map(|r| r.key.clone())
    }

    /// Stored record for a client, if any.
    pub fn session(&self, client_key: &str) -> Option<SessionRecord> {
        self.sessions.read().get(client_key).cloned()
    }

    /// Number of clients holding a session.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Drop a client's session. Returns `true` if one existed.
    pub fn remove_session(&self, client_key: &str) -> bool {
        self.sessions.write().remove(client_key).is_some()
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn register_session(&self, session: ClientSession) -> Result<SessionKey, RegistryError> {
        if session.client_key.is_empty() {
            return Err(RegistryError::InvalidClient(
                "empty client key".to_string(),
            ));
        }

        let mut sessions = self.sessions.write();

        if let Some(record) = sessions.get_mut(&session.client_key) {
            record.registrations = record.registrations.saturating_add(1);
            if self.config.policy == RegistrationPolicy::ReuseActive {
                debug!(client = %session.client_key, "client session reused");
                return Ok(record.key.clone());
            }
            record.key = SessionKey::generate();
            debug!(client = %session.client_key, "client session rekeyed");
            return Ok(record.key.clone());
        }

        if sessions.len() >= self.config.max_sessions {
            return Err(RegistryError::CapacityReached {
                max: self.config.max_sessions,
            });
        }

        let key = SessionKey::generate();
        sessions.insert(
            session.client_key.clone(),
            SessionRecord {
                key: key.clone(),
                registrations: 1,
            },
        );
        debug!(client = %session.client_key, sessions = sessions.len(), "client session registered");
        Ok(key)
    }
}
