use super::handlers::{process_discovery_request, process_server_accepted_request};
use super::server::NotificationServer;
use crate::domain::{DiscoveryError, ProtocolStep, ReceivedMessage};
use crate::ports::Subscription;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn the processing loop for one subscription.
///
/// Every delivered message is handled on its own task, so a slow registry
/// call never holds up the next delivery. At most `channel_capacity`
/// handlers run at once per loop; past that the loop stops draining and
/// deliveries queue in the bounded filter channel. The loop ends when the
/// transport closes the subscription's channel; handler tasks already
/// spawned run to completion on their own.
pub(crate) fn spawn_request_processor(
    server: Arc<NotificationServer>,
    step: ProtocolStep,
    subscription: Subscription,
) -> JoinHandle<()> {
    let permits = server
        .config()
        .channel_capacity
        .clamp(1, Semaphore::MAX_PERMITS);
    let in_flight = Arc::new(Semaphore::new(permits));

    tokio::spawn(async move {
        let Subscription {
            handle,
            mut messages,
        } = subscription;
        debug!(step = %step, filter = handle.id(), permits, "request processor started");

        while let Some(msg) = messages.recv().await {
            // Never closed, so this only waits
            let Ok(permit) = Arc::clone(&in_flight).acquire_owned().await else {
                break;
            };
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = dispatch(&server, step, &msg).await {
                    warn!(step = %step, error = %e, "failed to process request");
                }
            });
        }

        debug!(step = %step, filter = handle.id(), "request processor stopped");
    })
}

pub(super) async fn dispatch(
    server: &NotificationServer,
    step: ProtocolStep,
    msg: &ReceivedMessage,
) -> Result<(), DiscoveryError> {
    match step {
        ProtocolStep::Discover => process_discovery_request(server, msg).await,
        ProtocolStep::ServerAccepted => process_server_accepted_request(server, msg).await,
        ProtocolStep::ProposeServer | ProtocolStep::AckSubscription => {
            Err(DiscoveryError::UnhandledStep(step))
        }
    }
}
