use super::core::{ActiveFilters, DiscoveryService};
use super::handlers;
use super::processor::spawn_request_processor;
use crate::domain::{DiscoveryError, ProtocolStep, ReceivedMessage, ServiceState};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl DiscoveryService {
    /// Install the Discover and ServerAccepted filters and spawn one
    /// processing loop per filter.
    ///
    /// # Errors
    ///
    /// - `AlreadyStarted` if the service is not stopped (no filter is installed)
    /// - `FilterInstall` if either filter fails; a Discover filter installed
    ///   before the failure is removed again and the state stays `Stopped`
    pub async fn start(&self) -> Result<(), DiscoveryError> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != ServiceState::Stopped {
            return Err(DiscoveryError::AlreadyStarted(lifecycle.state));
        }
        lifecycle.state = ServiceState::Starting;

        // notification server discovery requests
        let discover = match self.server.install_topic_filter(ProtocolStep::Discover) {
            Ok(subscription) => subscription,
            Err(e) => {
                lifecycle.state = ServiceState::Stopped;
                return Err(e);
            }
        };

        // notification server accept/select requests
        let accepted = match self
            .server
            .install_topic_filter(ProtocolStep::ServerAccepted)
        {
            Ok(subscription) => subscription,
            Err(e) => {
                self.server.remove_topic_filter(discover.handle);
                lifecycle.state = ServiceState::Stopped;
                warn!(error = %e, "discovery start failed, discover filter rolled back");
                return Err(e);
            }
        };

        let discover_handle = discover.handle;
        let accepted_handle = accepted.handle;
        let processors = vec![
            spawn_request_processor(Arc::clone(&self.server), ProtocolStep::Discover, discover),
            spawn_request_processor(
                Arc::clone(&self.server),
                ProtocolStep::ServerAccepted,
                accepted,
            ),
        ];

        lifecycle.active = Some(ActiveFilters {
            discover: discover_handle,
            accepted: accepted_handle,
            processors,
        });
        lifecycle.state = ServiceState::Running;

        info!(server = %self.server.identity(), "notification server discovery service started");
        Ok(())
    }

    /// Remove both filters and return to `Stopped`.
    ///
    /// Processing loops end once their channels close. Handler tasks already
    /// in flight are neither cancelled nor awaited. Stopping a stopped
    /// service is a no-op.
    pub async fn stop(&self) -> Result<(), DiscoveryError> {
        let mut lifecycle = self.lifecycle.lock();
        let Some(active) = lifecycle.active.take() else {
            debug!("discovery service already stopped");
            return Ok(());
        };
        lifecycle.state = ServiceState::Stopping;

        self.server.remove_topic_filter(active.discover);
        self.server.remove_topic_filter(active.accepted);
        // Loops are detached; they drain and exit on channel close
        drop(active.processors);

        lifecycle.state = ServiceState::Stopped;
        info!(server = %self.server.identity(), "notification server discovery service stopped");
        Ok(())
    }

    /// Process a Discover message directly, bypassing the transport loop.
    pub async fn process_discovery_request(
        &self,
        msg: &ReceivedMessage,
    ) -> Result<(), DiscoveryError> {
        handlers::process_discovery_request(&self.server, msg).await
    }

    /// Process a ServerAccepted message directly, bypassing the transport loop.
    pub async fn process_server_accepted_request(
        &self,
        msg: &ReceivedMessage,
    ) -> Result<(), DiscoveryError> {
        handlers::process_server_accepted_request(&self.server, msg).await
    }
}
