//! # Isolation
//!
//! Several servers and clients sharing one network must not see each
//! other's sessions.

#[cfg(test)]
mod tests {
    use crate::fixtures::{client, endpoint_key, server_node, server_node_with_key, WAIT};
    use notification_discovery::{ClientError, InMemoryNetwork, ProtocolKey, RegistrationPolicy};

    #[tokio::test]
    async fn test_accept_registers_only_with_named_server() {
        let network = InMemoryNetwork::new();
        let a = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        let b = server_node(&network, 0xb0, RegistrationPolicy::AlwaysFresh);
        a.service.start().await.unwrap();
        b.service.start().await.unwrap();
        let client = client(&network, 0x01);

        let mut servers = client.discover(WAIT).await.unwrap();
        servers.sort();
        let mut expected = vec![a.server_id(), b.server_id()];
        expected.sort();
        assert_eq!(servers, expected);

        let subscription = client.accept(&b.server_id(), WAIT).await.unwrap();

        assert_eq!(subscription.server, b.server_id());
        assert_eq!(a.registry.session_count(), 0);
        assert_eq!(b.registry.session_count(), 1);
    }

    #[tokio::test]
    async fn test_clients_receive_only_their_own_ack() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        server.service.start().await.unwrap();
        let first = client(&network, 0x01);
        let second = client(&network, 0x02);

        let server_id = server.server_id();
        let (one, two) = tokio::join!(
            first.accept(&server_id, WAIT),
            second.accept(&server_id, WAIT)
        );
        let (one, two) = (one.unwrap(), two.unwrap());

        assert_ne!(one.session_key, two.session_key);
        assert_eq!(
            server.registry.session_key(&endpoint_key(0x01).to_hex()),
            Some(one.session_key)
        );
        assert_eq!(
            server.registry.session_key(&endpoint_key(0x02).to_hex()),
            Some(two.session_key)
        );
    }

    #[tokio::test]
    async fn test_server_with_other_protocol_key_is_invisible() {
        let network = InMemoryNetwork::new();
        let hidden = server_node_with_key(
            &network,
            0xa0,
            RegistrationPolicy::AlwaysFresh,
            ProtocolKey::from_password("private"),
        );
        let visible = server_node(&network, 0xb0, RegistrationPolicy::AlwaysFresh);
        hidden.service.start().await.unwrap();
        visible.service.start().await.unwrap();
        let client = client(&network, 0x01);

        assert_eq!(client.discover(WAIT).await.unwrap(), vec![visible.server_id()]);

        let err = client.accept(&hidden.server_id(), WAIT).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
        assert_eq!(hidden.registry.session_count(), 0);
    }

    #[tokio::test]
    async fn test_same_client_on_two_servers_gets_two_keys() {
        let network = InMemoryNetwork::new();
        let a = server_node(&network, 0xa0, RegistrationPolicy::ReuseActive);
        let b = server_node(&network, 0xb0, RegistrationPolicy::ReuseActive);
        a.service.start().await.unwrap();
        b.service.start().await.unwrap();
        let client = client(&network, 0x01);

        let with_a = client.accept(&a.server_id(), WAIT).await.unwrap();
        let with_b = client.accept(&b.server_id(), WAIT).await.unwrap();

        assert_ne!(with_a.session_key, with_b.session_key);
        assert_eq!(a.registry.session_count(), 1);
        assert_eq!(b.registry.session_count(), 1);
    }
}
