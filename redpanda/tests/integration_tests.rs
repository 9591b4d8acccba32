//! Integration tests for [`RedpandaEventBus`] against a real Kafka instance.
//!
//! # Running These Tests
//!
//! These tests are marked as `#[ignore]` by default because they:
//! - Require Docker to be running (for testcontainers)
//! - Take 15-60 seconds per test to spin up Kafka
//!
//! To run explicitly:
//! ```bash
//! cargo test -p microshop-redpanda --test integration_tests -- --ignored
//! ```

#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use futures::StreamExt;
use microshop_core::event::SerializedEvent;
use microshop_core::event_bus::EventBus;
use microshop_redpanda::RedpandaEventBus;
use std::time::Duration;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::kafka::{KAFKA_PORT, Kafka};

fn test_event(event_type: &str, data: &[u8]) -> SerializedEvent {
    SerializedEvent::new(event_type.to_string(), data.to_vec(), None)
}

/// Start Kafka and wait until it accepts a publish.
async fn start_kafka() -> (ContainerAsync<Kafka>, String) {
    let kafka = Kafka::default()
        .with_env_var("KAFKA_AUTO_CREATE_TOPICS_ENABLE", "true")
        .start()
        .await
        .expect("Failed to start Kafka container");

    let host = kafka.get_host().await.expect("Failed to get host");
    let port = kafka
        .get_host_port_ipv4(KAFKA_PORT)
        .await
        .expect("Failed to get port");
    let brokers = format!("{host}:{port}");

    let max_attempts = 60;
    for attempt in 1..=max_attempts {
        if let Ok(bus) = RedpandaEventBus::new(&brokers) {
            if bus.publish("warmup-topic", &test_event("warmup", b"{}")).await.is_ok() {
                tokio::time::sleep(Duration::from_millis(500)).await;
                return (kafka, brokers);
            }
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(
            attempt != max_attempts,
            "Kafka failed to become ready after {max_attempts} attempts"
        );
    }
    unreachable!("loop either returns or fails the assertion")
}

/// Receive `count` events that are not warmups, or panic after `timeout`.
async fn receive(
    stream: &mut microshop_core::event_bus::EventStream,
    count: usize,
    timeout: Duration,
) -> Vec<SerializedEvent> {
    let mut received = Vec::new();
    tokio::time::timeout(timeout, async {
        while received.len() < count {
            if let Some(result) = stream.next().await {
                let event = result.expect("Failed to receive event");
                if event.event_type != "warmup" {
                    received.push(event);
                }
            }
        }
    })
    .await
    .expect("Timeout waiting for events");
    received
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_publish_and_subscribe_round_trip() {
    let (_kafka, brokers) = start_kafka().await;

    let event_bus = RedpandaEventBus::builder()
        .brokers(&brokers)
        .consumer_group("orders.q")
        .build()
        .expect("Failed to create event bus");

    event_bus
        .publish("orders.ex", &test_event("warmup", b"{}"))
        .await
        .expect("Failed to create topic");

    let mut stream = event_bus
        .subscribe(&["orders.ex"])
        .await
        .expect("Failed to subscribe");
    tokio::time::sleep(Duration::from_secs(2)).await;

    let payload = br#"{"event":"order.created","orderId":1}"#;
    let event = SerializedEvent::new(
        "order.created".to_string(),
        payload.to_vec(),
        Some(serde_json::json!({ "correlation_id": "abc" })),
    );
    event_bus
        .publish("orders.ex", &event)
        .await
        .expect("Failed to publish");

    let received = receive(&mut stream, 1, Duration::from_secs(15)).await;

    assert_eq!(received[0], event);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_events_of_one_type_keep_their_order() {
    let (_kafka, brokers) = start_kafka().await;

    let event_bus = RedpandaEventBus::builder()
        .brokers(&brokers)
        .auto_offset_reset("earliest")
        .build()
        .expect("Failed to create event bus");

    for n in 0..5_u8 {
        event_bus
            .publish("ordering-test", &test_event("order.created", &[n]))
            .await
            .expect("Failed to publish");
    }

    let mut stream = event_bus
        .subscribe(&["ordering-test"])
        .await
        .expect("Failed to subscribe");

    let received = receive(&mut stream, 5, Duration::from_secs(20)).await;
    let data: Vec<u8> = received.iter().map(|e| e.data[0]).collect();

    assert_eq!(data, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unkeyed_message_is_delivered_with_empty_event_type() {
    use rdkafka::config::ClientConfig;
    use rdkafka::producer::{FutureProducer, FutureRecord};
    use rdkafka::util::Timeout;

    let (_kafka, brokers) = start_kafka().await;

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .create()
        .expect("Failed to create raw producer");
    producer
        .send(
            FutureRecord::<(), _>::to("unkeyed").payload("not an event"),
            Timeout::After(Duration::from_secs(5)),
        )
        .await
        .expect("Failed to send raw message");

    let event_bus = RedpandaEventBus::new(&brokers).expect("Failed to create event bus");
    let mut stream = event_bus
        .subscribe(&["unkeyed"])
        .await
        .expect("Failed to subscribe");

    let first = tokio::time::timeout(Duration::from_secs(20), stream.next())
        .await
        .expect("Timeout waiting for message")
        .expect("Stream ended");

    let event = first.expect("Unkeyed message should still be delivered");
    assert_eq!(event.event_type, "");
    assert_eq!(event.data, b"not an event".to_vec());
}
