use crate::domain::{DiscoveryError, ReceivedMessage, ServiceState};
use crate::ports::DiscoveryApi;
use crate::service::DiscoveryService;
use async_trait::async_trait;

#[async_trait]
impl DiscoveryApi for DiscoveryService {
    async fn start(&self) -> Result<(), DiscoveryError> {
        DiscoveryService::start(self).await
    }

    async fn stop(&self) -> Result<(), DiscoveryError> {
        DiscoveryService::stop(self).await
    }

    fn state(&self) -> ServiceState {
        DiscoveryService::state(self)
    }

    async fn process_discovery_request(&self, msg: &ReceivedMessage) -> Result<(), DiscoveryError> {
        DiscoveryService::process_discovery_request(self, msg).await
    }

    async fn process_server_accepted_request(
        &self,
        msg: &ReceivedMessage,
    ) -> Result<(), DiscoveryError> {
        DiscoveryService::process_server_accepted_request(self, msg).await
    }
}
