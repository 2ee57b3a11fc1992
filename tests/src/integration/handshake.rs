//! # Handshake Flows
//!
//! Discover → propose → accept → ack, driven by `DiscoveryClient` and by raw
//! envelopes on the wire.

#[cfg(test)]
mod tests {
    use crate::fixtures::{client, endpoint_key, server_node, WAIT};
    use notification_discovery::{
        DiscoveryConfig, DiscoveryService, EnvelopeTransport, InMemoryNetwork,
        InMemorySessionRegistry, MessageParams, NodeIdentity, NotificationServer, ProtocolKey,
        ProtocolStep, RegistrationPolicy,
    };
    use std::sync::Arc;
    use tokio::time::timeout;

    fn broadcast(step: ProtocolStep, payload: &str) -> MessageParams {
        MessageParams {
            destination: None,
            key: ProtocolKey::default(),
            topic: step.topic(),
            payload: payload.as_bytes().to_vec(),
            ttl: 10,
            pow: 0.0,
            work_time: 1,
        }
    }

    #[tokio::test]
    async fn test_full_handshake() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        server.service.start().await.unwrap();
        let client = client(&network, 0x01);

        let servers = client.discover(WAIT).await.unwrap();
        assert_eq!(servers, vec![server.server_id()]);

        let subscription = client.accept(&servers[0], WAIT).await.unwrap();
        assert_eq!(subscription.server, server.server_id());
        assert_eq!(
            server.registry.session_key(&endpoint_key(0x01).to_hex()),
            Some(subscription.session_key)
        );
    }

    #[tokio::test]
    async fn test_wire_format_of_proposal_and_ack() {
        let network = InMemoryNetwork::new();
        let server = NotificationServer::new(
            NodeIdentity::parse("abcd").unwrap(),
            ProtocolKey::default(),
            DiscoveryConfig::for_testing(),
            Arc::new(network.endpoint(endpoint_key(0xee))),
            Arc::new(InMemorySessionRegistry::default()),
        );
        let service = DiscoveryService::new(Arc::new(server));
        service.start().await.unwrap();

        let raw = network.endpoint(endpoint_key(0x01));
        let mut proposals = raw
            .install_filter(ProtocolStep::ProposeServer.topic(), &ProtocolKey::default())
            .unwrap();
        let mut acks = raw
            .install_filter(ProtocolStep::AckSubscription.topic(), &ProtocolKey::default())
            .unwrap();

        raw.publish(broadcast(ProtocolStep::Discover, "{}").wrap().unwrap())
            .await
            .unwrap();
        let proposal = timeout(WAIT, proposals.messages.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(proposal.payload, br#"{"server":"0xabcd"}"#);
        assert_eq!(proposal.src, Some(endpoint_key(0xee)));

        raw.publish(
            broadcast(ProtocolStep::ServerAccepted, r#"{"server":"0xabcd"}"#)
                .wrap()
                .unwrap(),
        )
        .await
        .unwrap();
        let ack = timeout(WAIT, acks.messages.recv()).await.unwrap().unwrap();
        let ack: serde_json::Value = serde_json::from_slice(&ack.payload).unwrap();

        assert_eq!(ack["server"], "0xabcd");
        let key = ack["key"].as_str().unwrap();
        assert!(key.starts_with("0x"));
        assert_eq!(hex::decode(&key[2..]).unwrap().len(), 32);
    }

    #[tokio::test]
    async fn test_anonymous_discover_gets_no_reply() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        server.service.start().await.unwrap();

        let anonymous = network.anonymous_endpoint();
        let mut proposals = anonymous
            .install_filter(ProtocolStep::ProposeServer.topic(), &ProtocolKey::default())
            .unwrap();
        anonymous
            .publish(broadcast(ProtocolStep::Discover, "{}").wrap().unwrap())
            .await
            .unwrap();

        assert!(timeout(WAIT, proposals.messages.recv()).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_accept_always_fresh_rekeys() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        server.service.start().await.unwrap();
        let client = client(&network, 0x01);

        let first = client.accept(&server.server_id(), WAIT).await.unwrap();
        let second = client.accept(&server.server_id(), WAIT).await.unwrap();

        assert_ne!(first.session_key, second.session_key);
        assert_eq!(server.registry.session_count(), 1);
        assert_eq!(
            server.registry.session_key(&endpoint_key(0x01).to_hex()),
            Some(second.session_key)
        );
    }

    #[tokio::test]
    async fn test_duplicate_accept_reuse_active_is_idempotent() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::ReuseActive);
        server.service.start().await.unwrap();
        let client = client(&network, 0x01);

        let first = client.accept(&server.server_id(), WAIT).await.unwrap();
        let second = client.accept(&server.server_id(), WAIT).await.unwrap();

        assert_eq!(first.session_key, second.session_key);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_clients_concurrently() {
        let network = InMemoryNetwork::new();
        let server = server_node(&network, 0xa0, RegistrationPolicy::AlwaysFresh);
        server.service.start().await.unwrap();
        let server_id = server.server_id();

        let mut tasks = Vec::new();
        for val in 1..=20u8 {
            let client = client(&network, val);
            let server_id = server_id.clone();
            tasks.push(tokio::spawn(async move {
                client.accept(&server_id, WAIT * 3).await
            }));
        }

        let mut keys = Vec::new();
        for task in tasks {
            keys.push(task.await.unwrap().unwrap().session_key.to_wire());
        }
        keys.sort();
        keys.dedup();

        assert_eq!(keys.len(), 20);
        assert_eq!(server.registry.session_count(), 20);
    }
}
