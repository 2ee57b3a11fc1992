use super::server::NotificationServer;
use crate::domain::{FilterHandle, NodeIdentity, ServiceState};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Notification server discovery service.
///
/// Owns the two long-lived subscriptions (Discover and ServerAccepted) and
/// drives the advertise / accept / acknowledge steps for its server.
///
/// # Example
///
/// ```rust,ignore
/// let network = InMemoryNetwork::new();
/// let transport = Arc::new(network.endpoint(server_key));
/// let registry = Arc::new(InMemorySessionRegistry::new(RegistryConfig::default()));
/// let server = NotificationServer::new(identity, ProtocolKey::default(),
///     DiscoveryConfig::default(), transport, registry);
///
/// let service = DiscoveryService::new(Arc::new(server));
/// service.start().await?;
/// // ...
/// service.stop().await?;
/// ```
pub struct DiscoveryService {
    /// Hosting server context (identity, protocol key, transport, registry)
    pub(crate) server: Arc<NotificationServer>,
    /// Lifecycle state and the filters owned while running
    pub(crate) lifecycle: Mutex<Lifecycle>,
}

/// Mutable lifecycle data, guarded as one unit so state and filters never
/// disagree.
#[derive(Default)]
pub(crate) struct Lifecycle {
    pub(crate) state: ServiceState,
    pub(crate) active: Option<ActiveFilters>,
}

/// Filters and processing loops alive while the service runs.
pub(crate) struct ActiveFilters {
    pub(crate) discover: FilterHandle,
    pub(crate) accepted: FilterHandle,
    pub(crate) processors: Vec<JoinHandle<()>>,
}

impl DiscoveryService {
    /// Create a stopped discovery service for `server`.
    pub fn new(server: Arc<NotificationServer>) -> Self {
        Self {
            server,
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    /// The hosting server context.
    pub fn server(&self) -> &Arc<NotificationServer> {
        &self.server
    }

    /// Our server identity.
    pub fn identity(&self) -> &NodeIdentity {
        self.server.identity()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServiceState {
        self.lifecycle.lock().state
    }

    /// Handles of the installed filters, if running.
    pub fn filter_handles(&self) -> Option<(FilterHandle, FilterHandle)> {
        self.lifecycle
            .lock()
            .active
            .as_ref()
            .map(|active| (active.discover, active.accepted))
    }
}

impl Drop for DiscoveryService {
    fn drop(&mut self) {
        if let Some(active) = self.lifecycle.get_mut().active.take() {
            self.server.remove_topic_filter(active.discover);
            self.server.remove_topic_filter(active.accepted);
        }
    }
}
