//! Test doubles for the outbound ports.
//!
//! Requires feature: `test-utils` (always available to this crate's own tests).

use crate::domain::{
    ClientSession, Envelope, FilterHandle, ProtocolKey, ReceivedMessage, RegistryError,
    SessionKey, Topic, TransportError,
};
use crate::ports::{EnvelopeTransport, SessionRegistry, Subscription};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Transport that records every publish and lets tests inject deliveries.
///
/// Filter installation can be made to fail from the n-th call onwards and
/// publishing can be made to fail outright.
#[derive(Default)]
pub struct RecordingTransport {
    published: Mutex<Vec<Envelope>>,
    filters: Mutex<HashMap<FilterHandle, (Topic, mpsc::Sender<ReceivedMessage>)>>,
    removed: Mutex<Vec<FilterHandle>>,
    next_filter: AtomicU64,
    install_calls: AtomicUsize,
    fail_install_from: Mutex<Option<usize>>,
    fail_publish: Mutex<Option<TransportError>>,
}

impl RecordingTransport {
    /// Create a transport that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every `install_filter` call from the `n`-th (1-based) onwards.
    pub fn fail_install_from(self, n: usize) -> Self {
        *self.fail_install_from.lock() = Some(n);
        self
    }

    /// Fail every publish with `error`.
    pub fn fail_publish(self, error: TransportError) -> Self {
        *self.fail_publish.lock() = Some(error);
        self
    }

    /// Envelopes published so far.
    pub fn published(&self) -> Vec<Envelope> {
        self.published.lock().clone()
    }

    /// Envelopes published under `topic`.
    pub fn published_on(&self, topic: Topic) -> Vec<Envelope> {
        self.published
            .lock()
            .iter()
            .filter(|e| e.topic() == topic)
            .cloned()
            .collect()
    }

    /// Handles currently installed.
    pub fn active_filters(&self) -> Vec<FilterHandle> {
        let mut handles: Vec<_> = self.filters.lock().keys().copied().collect();
        handles.sort();
        handles
    }

    /// Handles removed so far, in removal order.
    pub fn removed_filters(&self) -> Vec<FilterHandle> {
        self.removed.lock().clone()
    }

    /// Number of `install_filter` calls, including failed ones.
    pub fn install_calls(&self) -> usize {
        self.install_calls.load(Ordering::SeqCst)
    }

    /// Push a message into every active filter on `msg.topic`.
    ///
    /// Returns how many filters accepted it.
    pub fn deliver(&self, msg: ReceivedMessage) -> usize {
        let filters = self.filters.lock();
        filters
            .values()
            .filter(|(topic, _)| *topic == msg.topic)
            .filter(|(_, sender)| sender.try_send(msg.clone()).is_ok())
            .count()
    }
}

#[async_trait]
impl EnvelopeTransport for RecordingTransport {
    fn install_filter(
        &self,
        topic: Topic,
        _key: &ProtocolKey,
    ) -> Result<Subscription, TransportError> {
        let call = self.install_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(n) = *self.fail_install_from.lock() {
            if call >= n {
                return Err(TransportError::FilterRejected(format!(
                    "install call {call} rejected"
                )));
            }
        }

        let handle = FilterHandle::new(self.next_filter.fetch_add(1, Ordering::SeqCst) + 1);
        let (sender, messages) = mpsc::channel(64);
        self.filters.lock().insert(handle, (topic, sender));
        Ok(Subscription { handle, messages })
    }

    fn remove_filter(&self, handle: FilterHandle) -> bool {
        self.removed.lock().push(handle);
        self.filters.lock().remove(&handle).is_some()
    }

    async fn publish(&self, envelope: Envelope) -> Result<(), TransportError> {
        if let Some(error) = self.fail_publish.lock().clone() {
            return Err(error);
        }
        self.published.lock().push(envelope);
        Ok(())
    }
}

/// Registry that records every call and returns scripted keys.
///
/// Keys are `[n; 32]` where `n` is the 1-based call number, unless the
/// registry is set to fail. An optional delay keeps calls in flight so tests
/// can observe how many overlap.
#[derive(Default)]
pub struct CountingRegistry {
    calls: Mutex<Vec<ClientSession>>,
    fail_with: Mutex<Option<RegistryError>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl CountingRegistry {
    /// Create a registry that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every registration with `error`.
    pub fn failing(error: RegistryError) -> Self {
        let registry = Self::default();
        *registry.fail_with.lock() = Some(error);
        registry
    }

    /// Hold every registration for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Most registrations ever in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Descriptors received so far.
    pub fn calls(&self) -> Vec<ClientSession> {
        self.calls.lock().clone()
    }

    /// Number of registrations attempted.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl SessionRegistry for CountingRegistry {
    async fn register_session(&self, session: ClientSession) -> Result<SessionKey, RegistryError> {
        if let Some(delay) = self.delay {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        let mut calls = self.calls.lock();
        calls.push(session);
        if let Some(error) = self.fail_with.lock().clone() {
            return Err(error);
        }
        let n = u8::try_from(calls.len()).unwrap_or(u8::MAX);
        Ok(SessionKey::from_bytes(vec![n; 32]))
    }
}
