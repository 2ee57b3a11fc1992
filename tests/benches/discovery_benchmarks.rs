//! # Notification Discovery Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Topics | Keccak-256 step topic derivation |
//! | Envelopes | Parameter validation and wrapping |
//! | Handlers | Accept handling with a real keystore |
//! | Network | In-memory broadcast fan-out |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use notification_discovery::{
    DiscoveryConfig, DiscoveryService, EnvelopeTransport, InMemoryNetwork,
    InMemorySessionRegistry, MessageParams, NodeIdentity, NotificationServer, ProtocolKey,
    ProtocolStep, PublicKey, ReceivedMessage, Topic,
};
use std::sync::Arc;
use std::time::Duration;

fn bench_topic_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("topics");

    group.bench_function("derive_step_topic", |b| {
        b.iter(|| black_box(Topic::derive(black_box("ACK_NOTIFICATION_SERVER_SUBSCRIPTION"))))
    });
    group.bench_function("protocol_key_from_password", |b| {
        b.iter(|| black_box(ProtocolKey::from_password(black_box("NOTIFICATION_PROTOCOL_KEY"))))
    });

    group.finish();
}

fn bench_envelope_wrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelopes");

    for size in [64usize, 1024, 64 * 1024] {
        let params = MessageParams {
            destination: Some(PublicKey::from_bytes(vec![1u8; 64])),
            key: ProtocolKey::default(),
            topic: ProtocolStep::AckSubscription.topic(),
            payload: vec![b'x'; size],
            ttl: 50,
            pow: 0.2,
            work_time: 5,
        };
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("wrap", size), &params, |b, params| {
            b.iter(|| black_box(params.clone().wrap().is_ok()))
        });
    }

    group.finish();
}

fn bench_accept_handler(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("handlers");
    group.measurement_time(Duration::from_secs(5));

    // No client filters installed, so acks are published into the void
    let network = InMemoryNetwork::new();
    let registry = Arc::new(InMemorySessionRegistry::default());
    let server = NotificationServer::new(
        NodeIdentity::parse("abcd").unwrap(),
        ProtocolKey::default(),
        DiscoveryConfig::default(),
        Arc::new(network.endpoint(PublicKey::from_bytes(vec![0xab, 0xcd]))),
        registry,
    );
    let service = DiscoveryService::new(Arc::new(server));
    let msg = ReceivedMessage {
        src: Some(PublicKey::from_bytes(vec![7u8; 64])),
        payload: br#"{"server":"0xabcd"}"#.to_vec(),
        topic: ProtocolStep::ServerAccepted.topic(),
    };
    let foreign = ReceivedMessage {
        payload: br#"{"server":"0xbeef"}"#.to_vec(),
        ..msg.clone()
    };

    group.bench_function("accept_registers", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(service.process_server_accepted_request(&msg).await.is_ok()) })
    });
    group.bench_function("accept_for_other_server", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(service.process_server_accepted_request(&foreign).await.is_ok())
        })
    });

    group.finish();
}

fn bench_network_fanout(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("network");

    for filters in [1usize, 16, 128] {
        let network = InMemoryNetwork::with_capacity(1);
        let topic = ProtocolStep::Discover.topic();
        // Receivers are kept alive but never drained; full channels drop
        let _subscriptions: Vec<_> = (0..filters)
            .map(|i| {
                network
                    .endpoint(PublicKey::from_bytes((i as u32).to_be_bytes().to_vec()))
                    .install_filter(topic, &ProtocolKey::default())
                    .unwrap()
            })
            .collect();
        let sender = network.endpoint(PublicKey::from_bytes(vec![0xff; 4]));
        let envelope = MessageParams {
            destination: None,
            key: ProtocolKey::default(),
            topic,
            payload: b"{}".to_vec(),
            ttl: 50,
            pow: 0.2,
            work_time: 5,
        }
        .wrap()
        .unwrap();

        group.throughput(Throughput::Elements(filters as u64));
        group.bench_with_input(
            BenchmarkId::new("broadcast", filters),
            &envelope,
            |b, envelope| {
                b.to_async(&rt)
                    .iter(|| async { black_box(sender.publish(envelope.clone()).await.is_ok()) })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_topic_derivation,
    bench_envelope_wrap,
    bench_accept_handler,
    bench_network_fanout
);
criterion_main!(benches);
