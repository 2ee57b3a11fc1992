//! # Lifecycle Seen From the Network
//!
//! What clients observe while a server starts, stops and restarts.

#[cfg(test)]
mod tests {
    use crate::fixtures::{client, server_node, WAIT};
    use notification_discovery::{
        ClientError, InMemoryNetwork, ProtocolStep, RegistrationPolicy, ServiceState,
    };

    #[tokio::test]
    async fn test_stopped_server_does_not_answer() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        server.service.start().await.unwrap();
        server.service.stop().await.unwrap();
        let client = client(&network, 0x01);

        assert!(client.discover(WAIT).await.unwrap().is_empty());
        assert!(matches!(
            client.accept(&server.server_id(), WAIT).await,
            Err(ClientError::Timeout { .. })
        ));
        assert_eq!(server.registry.session_count(), 0);
    }

    #[tokio::test]
    async fn test_restarted_server_answers_again() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        let client = client(&network, 0x01);

        server.service.start().await.unwrap();
        server.service.stop().await.unwrap();
        server.service.start().await.unwrap();

        assert_eq!(client.discover(WAIT).await.unwrap(), vec![server.server_id()]);
        assert_eq!(network.filter_count_for(ProtocolStep::Discover.topic()), 1);
    }

    #[tokio::test]
    async fn test_double_start_keeps_single_filter_pair() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);

        server.service.start().await.unwrap();
        assert!(server.service.start().await.is_err());

        assert_eq!(server.service.state(), ServiceState::Running);
        assert_eq!(network.filter_count(), 2);

        // One proposal, not two
        assert_eq!(
            client(&network, 0x01).discover(WAIT).await.unwrap(),
            vec![server.server_id()]
        );
        assert_eq!(network.envelopes_published(), 2);
    }

    #[tokio::test]
    async fn test_network_shutdown_fails_start() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        network.shutdown();

        assert!(server.service.start().await.is_err());
        assert_eq!(server.service.state(), ServiceState::Stopped);
    }

    #[tokio::test]
    async fn test_dropping_service_frees_filters() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        server.service.start().await.unwrap();
        assert_eq!(network.filter_count(), 2);

        drop(server);

        assert_eq!(network.filter_count(), 0);
    }
}
