//! # In-Memory Envelope Network
//!
//! Process-local implementation of the [`EnvelopeTransport`] port.
//!
//! Every participant gets its own [`NetworkEndpoint`] (optionally carrying a
//! public key that is stamped on its envelopes as the authenticated sender).
//! An installed filter receives an envelope when:
//!
//! - the topics match,
//! - the symmetric keys match, and
//! - the envelope is a broadcast or is addressed to the filter's owner.
//!
//! Delivery is at-most-effort: each filter has a bounded channel and a full
//! channel drops the envelope. Removing a filter drops its sender, which
//! closes the channel and ends the consumer's processing loop.

use crate::domain::{
    Envelope, FilterHandle, ProtocolKey, PublicKey, ReceivedMessage, Topic, TransportError,
};
use crate::ports::{EnvelopeTransport, Subscription};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Default per-filter channel capacity.
pub const DEFAULT_FILTER_CAPACITY: usize = 1024;

/// Shared in-memory network. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct InMemoryNetwork {
    inner: Arc<NetworkInner>,
}

struct NetworkInner {
    /// Installed filters by handle.
    filters: RwLock<HashMap<FilterHandle, InstalledFilter>>,
    /// Next filter id.
    next_filter: AtomicU64,
    /// Total envelopes published.
    envelopes_published: AtomicU64,
    /// Total deliveries into filter channels.
    envelopes_delivered: AtomicU64,
    /// Set once `shutdown` is called.
    closed: AtomicBool,
    /// Per-filter channel capacity.
    capacity: usize,
}

struct InstalledFilter {
    owner: Option<PublicKey>,
    topic: Topic,
    key: ProtocolKey,
    sender: mpsc::Sender<ReceivedMessage>,
}

impl InstalledFilter {
    fn matches(&self, envelope: &Envelope) -> bool {
        if self.topic != envelope.topic() || &self.key != envelope.key() {
            return false;
        }
        match envelope.destination() {
            None => true,
            Some(dst) => self.owner.as_ref() == Some(dst),
        }
    }
}

impl InMemoryNetwork {
    /// Create a network with default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FILTER_CAPACITY)
    }

    /// Create a network with the given per-filter channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(NetworkInner {
                filters: RwLock::new(HashMap::new()),
                next_filter: AtomicU64::new(1),
                envelopes_published: AtomicU64::new(0),
                envelopes_delivered: AtomicU64::new(0),
                closed: AtomicBool::new(false),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Endpoint whose envelopes are signed with `identity`.
    #[must_use]
    pub fn endpoint(&self, identity: PublicKey) -> NetworkEndpoint {
        NetworkEndpoint {
            network: self.clone(),
            identity: Some(identity),
        }
    }

    /// Endpoint that publishes unsigned envelopes and only sees broadcasts.
    #[must_use]
    pub fn anonymous_endpoint(&self) -> NetworkEndpoint {
        NetworkEndpoint {
            network: self.clone(),
            identity: None,
        }
    }

    /// Number of installed filters.
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.inner.filters.read().len()
    }

    /// Number of installed filters on `topic`.
    #[must_use]
    pub fn filter_count_for(&self, topic: Topic) -> usize {
        self.inner
            .filters
            .read()
            .values()
            .filter(|f| f.topic == topic)
            .count()
    }

    /// Total envelopes published.
    #[must_use]
    pub fn envelopes_published(&self) -> u64 {
        self.inner.envelopes_published.load(Ordering::Relaxed)
    }

    /// Total deliveries into filter channels.
    #[must_use]
    pub fn envelopes_delivered(&self) -> u64 {
        self.inner.envelopes_delivered.load(Ordering::Relaxed)
    }

    /// Close the network: drop every filter and refuse further use.
    pub fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        let removed = {
            let mut filters = self.inner.filters.write();
            let count = filters.len();
            filters.clear();
            count
        };
        debug!(filters = removed, "in-memory network shut down");
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn install(
        &self,
        owner: Option<PublicKey>,
        topic: Topic,
        key: &ProtocolKey,
    ) -> Result<Subscription, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let (sender, messages) = mpsc::channel(self.inner.capacity);
        let handle = FilterHandle::new(self.inner.next_filter.fetch_add(1, Ordering::Relaxed));
        self.inner.filters.write().insert(
            handle,
            InstalledFilter {
                owner,
                topic,
                key: key.clone(),
                sender,
            },
        );

        debug!(filter = handle.id(), topic = %topic, "filter installed");
        Ok(Subscription { handle, messages })
    }

    fn remove(&self, handle: FilterHandle) -> bool {
        let removed = self.inner.filters.write().remove(&handle).is_some();
        if removed {
            debug!(filter = handle.id(), "filter removed");
        }
        removed
    }

    fn deliver(&self, src: Option<PublicKey>, envelope: &Envelope) -> usize {
        self.inner.envelopes_published.fetch_add(1, Ordering::Relaxed);

        let filters = self.inner.filters.read();
        let mut delivered = 0;
        for (handle, filter) in filters.iter().filter(|(_, f)| f.matches(envelope)) {
            let msg = ReceivedMessage {
                src: src.clone(),
                payload: envelope.payload().to_vec(),
                topic: envelope.topic(),
            };
            match filter.sender.try_send(msg) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(filter = handle.id(), topic = %envelope.topic(), "filter channel full, envelope dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(filter = handle.id(), "filter consumer gone, envelope dropped");
                }
            }
        }

        self.inner
            .envelopes_delivered
            .fetch_add(delivered as u64, Ordering::Relaxed);
        delivered
    }
}

impl Default for InMemoryNetwork {
    fn default() -> Self {
        Self::new()
    }
}

/// One participant's view of an [`InMemoryNetwork`].
#[derive(Clone)]
pub struct NetworkEndpoint {
    network: InMemoryNetwork,
    identity: Option<PublicKey>,
}

impl NetworkEndpoint {
    /// Key stamped on outgoing envelopes, if any.
    pub fn identity(&self) -> Option<&PublicKey> {
        self.identity.as_ref()
    }

    /// The network this endpoint is attached to.
    pub fn network(&self) -> &InMemoryNetwork {
        &self.network
    }
}

#[async_trait]
impl EnvelopeTransport for NetworkEndpoint {
    fn install_filter(
        &self,
        topic: Topic,
        key: &ProtocolKey,
    ) -> Result<Subscription, TransportError> {
        self.network.install(self.identity.clone(), topic, key)
    }

    fn remove_filter(&self, handle: FilterHandle) -> bool {
        self.network.remove(handle)
    }

    async fn publish(&self, envelope: Envelope) -> Result<(), TransportError> {
        if self.network.is_closed() {
            return Err(TransportError::Closed);
        }
        let receivers = self.network.deliver(self.identity.clone(), &envelope);
        debug!(topic = %envelope.topic(), receivers, "envelope published");
        Ok(())
    }

    fn sender_key(&self) -> Option<PublicKey> {
        self.identity.clone()
    }
}
