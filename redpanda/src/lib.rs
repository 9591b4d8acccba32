//! Redpanda event bus implementation for Microshop.
//!
//! This crate provides a Redpanda-based event bus that implements the
//! [`EventBus`] trait from `microshop-core`. It uses rdkafka, so any
//! Kafka-compatible broker works.
//!
//! # Wire format
//!
//! - **Topic**: the exchange name (`orders.ex`)
//! - **Key**: the event type (`order.created`), which doubles as the routing key
//! - **Payload**: the event's JSON body, unwrapped
//! - **Header** `metadata`: the envelope metadata as JSON, when present
//!
//! Consumers that are not Rust services only need to read the payload.
//!
//! # Delivery Semantics
//!
//! Publishing waits for the broker ack up to the configured timeout; callers
//! that do not care (the order service) spawn the publish and move on.
//!
//! Subscribing is **at-least-once** with manual offset commits:
//! - Offsets are committed AFTER delivery to the subscriber's channel
//! - If the process crashes before commit, events will be redelivered
//! - Messages that cannot be turned into an event are reported in-band and
//!   committed, so they are never redelivered
//!
//! # Example
//!
//! ```no_run
//! use microshop_redpanda::RedpandaEventBus;
//! use microshop_core::event_bus::EventBus;
//! use microshop_core::event::SerializedEvent;
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let event_bus = RedpandaEventBus::new("localhost:9092")?;
//!
//! let event = SerializedEvent::new(
//!     "order.created".to_string(),
//!     br#"{"orderId":1}"#.to_vec(),
//!     None,
//! );
//! event_bus.publish("orders.ex", &event).await?;
//!
//! let mut stream = event_bus.subscribe(&["orders.ex"]).await?;
//! while let Some(result) = stream.next().await {
//!     match result {
//!         Ok(event) => println!("Received: {}", event.event_type),
//!         Err(e) => eprintln!("Error: {e}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::RedpandaConfig;

use microshop_core::event::SerializedEvent;
use microshop_core::event_bus::{EventBus, EventBusError, EventBusFuture, EventStream};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Header, Headers, Message, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;

const METADATA_HEADER: &str = "metadata";
const DEFAULT_BUFFER_SIZE: usize = 10;
const DEFAULT_OFFSET_RESET: &str = "earliest";

/// Redpanda event bus implementation.
///
/// # Example
///
/// ```no_run
/// use microshop_redpanda::RedpandaEventBus;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Basic configuration
/// let event_bus = RedpandaEventBus::new("localhost:9092")?;
///
/// // Custom configuration
/// let event_bus = RedpandaEventBus::builder()
///     .brokers("localhost:9092,localhost:9093")
///     .producer_acks("all")
///     .consumer_group("orders.q")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RedpandaEventBus {
    /// Kafka producer for publishing events
    producer: FutureProducer,
    /// Broker addresses (for creating consumers)
    brokers: String,
    /// Producer timeout
    timeout: Duration,
    /// Consumer group ID (if explicitly set)
    consumer_group: Option<String>,
    /// Event buffer size for subscribers
    buffer_size: usize,
    /// Auto offset reset policy
    auto_offset_reset: String,
}

impl RedpandaEventBus {
    /// Create a new Redpanda event bus with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ConnectionFailed`] if the producer cannot be
    /// created (invalid broker list, bad client configuration).
    pub fn new(brokers: &str) -> Result<Self, EventBusError> {
        Self::builder().brokers(brokers).build()
    }

    /// Create an event bus from a [`RedpandaConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ConnectionFailed`] if the producer cannot be created.
    pub fn from_config(config: &RedpandaConfig) -> Result<Self, EventBusError> {
        let mut builder = Self::builder()
            .brokers(config.brokers.clone())
            .producer_acks(config.producer_acks.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .buffer_size(config.buffer_size)
            .auto_offset_reset(config.auto_offset_reset.clone());
        if let Some(group) = &config.consumer_group {
            builder = builder.consumer_group(group.clone());
        }
        builder.build()
    }

    /// Create a new builder for configuring the event bus.
    #[must_use]
    pub fn builder() -> RedpandaEventBusBuilder {
        RedpandaEventBusBuilder::default()
    }

    /// Get a reference to the brokers string.
    #[must_use]
    pub fn brokers(&self) -> &str {
        &self.brokers
    }
}

/// Builder for configuring a [`RedpandaEventBus`].
#[derive(Default)]
pub struct RedpandaEventBusBuilder {
    brokers: Option<String>,
    producer_acks: Option<String>,
    timeout: Option<Duration>,
    consumer_group: Option<String>,
    buffer_size: Option<usize>,
    auto_offset_reset: Option<String>,
}

impl RedpandaEventBusBuilder {
    /// Set the broker addresses.
    ///
    /// # Parameters
    ///
    /// - `brokers`: Comma-separated list of broker addresses (e.g., "localhost:9092")
    #[must_use]
    pub fn brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = Some(brokers.into());
        self
    }

    /// Set the producer acknowledgment mode.
    ///
    /// # Parameters
    ///
    /// - `acks`: "0" (no acks), "1" (leader ack), "all" (all replicas ack)
    ///
    /// Default: "1"
    #[must_use]
    pub fn producer_acks(mut self, acks: impl Into<String>) -> Self {
        self.producer_acks = Some(acks.into());
        self
    }

    /// Set the producer send timeout.
    ///
    /// Default: 5 seconds
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the consumer group ID for subscriptions.
    ///
    /// If not set, the consumer group is derived from the subscribed topics.
    /// Instances sharing a group split the partitions between them, the way
    /// workers on one queue split its messages.
    #[must_use]
    pub fn consumer_group(mut self, consumer_group: impl Into<String>) -> Self {
        self.consumer_group = Some(consumer_group.into());
        self
    }

    /// Set how many events may sit between the Kafka consumer and the
    /// subscriber before the consumer stops fetching.
    ///
    /// Values below 1 are raised to 1. Default: 10.
    #[must_use]
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size.max(1));
        self
    }

    /// Set the auto offset reset policy for new consumer groups.
    ///
    /// - `"earliest"`: Start from the beginning of the topic
    /// - `"latest"`: Start from the end (only new events)
    ///
    /// Default: "earliest", so a consumer started after the producer still
    /// sees the first orders.
    #[must_use]
    pub fn auto_offset_reset(mut self, policy: impl Into<String>) -> Self {
        self.auto_offset_reset = Some(policy.into());
        self
    }

    /// Build the [`RedpandaEventBus`].
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ConnectionFailed`] if:
    /// - Brokers not set
    /// - Cannot create producer
    pub fn build(self) -> Result<RedpandaEventBus, EventBusError> {
        let brokers = self.brokers.ok_or_else(|| {
            EventBusError::ConnectionFailed("Brokers not configured".to_string())
        })?;
        let timeout = self.timeout.unwrap_or(Duration::from_secs(5));
        let acks = self.producer_acks.as_deref().unwrap_or("1");

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .set("message.timeout.ms", timeout.as_millis().to_string())
            .set("acks", acks)
            .create()
            .map_err(|e| {
                EventBusError::ConnectionFailed(format!("Failed to create producer: {e}"))
            })?;

        let buffer_size = self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let auto_offset_reset = self
            .auto_offset_reset
            .unwrap_or_else(|| DEFAULT_OFFSET_RESET.to_string());

        tracing::info!(
            brokers = %brokers,
            acks = acks,
            buffer_size = buffer_size,
            auto_offset_reset = %auto_offset_reset,
            "RedpandaEventBus created"
        );

        Ok(RedpandaEventBus {
            producer,
            brokers,
            timeout,
            consumer_group: self.consumer_group,
            buffer_size,
            auto_offset_reset,
        })
    }
}

/// Turn a received message back into the envelope it was published from.
fn decode_message(message: &BorrowedMessage<'_>) -> Result<SerializedEvent, EventBusError> {
    let metadata = message.headers().and_then(|headers| {
        headers
            .iter()
            .find(|h| h.key == METADATA_HEADER)
            .and_then(|h| h.value)
    });

    decode_parts(message.key(), message.payload(), metadata)
}

/// Build an envelope from raw message parts.
///
/// The key becomes the event type. Messages from producers that set no key,
/// or a key that is not UTF-8, get an empty event type so subscribers can
/// still look at the payload. Only a missing payload is an error.
fn decode_parts(
    key: Option<&[u8]>,
    payload: Option<&[u8]>,
    metadata: Option<&[u8]>,
) -> Result<SerializedEvent, EventBusError> {
    let event_type = match key.map(std::str::from_utf8) {
        Some(Ok(key)) => key.to_string(),
        Some(Err(e)) => {
            tracing::debug!(error = %e, "Message key is not UTF-8, leaving event type empty");
            String::new()
        }
        None => String::new(),
    };

    let Some(payload) = payload else {
        return Err(EventBusError::DeserializationFailed(
            "Message has no payload".to_string(),
        ));
    };

    let metadata = metadata.and_then(|v| serde_json::from_slice(v).ok());

    Ok(SerializedEvent::new(event_type, payload.to_vec(), metadata))
}

impl EventBus for RedpandaEventBus {
    fn publish(&self, topic: &str, event: &SerializedEvent) -> EventBusFuture<'_, ()> {
        let topic = topic.to_string();
        let event = event.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            let metadata = event
                .metadata
                .as_ref()
                .map(serde_json::to_vec)
                .transpose()
                .map_err(|e| EventBusError::PublishFailed {
                    topic: topic.clone(),
                    reason: format!("Failed to serialize metadata: {e}"),
                })?;

            // Events of the same type go to the same partition (ordering guarantee)
            let mut record = FutureRecord::to(&topic)
                .payload(&event.data)
                .key(event.event_type.as_bytes());
            if let Some(metadata) = &metadata {
                record = record.headers(OwnedHeaders::new().insert(Header {
                    key: METADATA_HEADER,
                    value: Some(metadata),
                }));
            }

            match self.producer.send(record, Timeout::After(timeout)).await {
                Ok((partition, offset)) => {
                    tracing::debug!(
                        topic = %topic,
                        partition = partition,
                        offset = offset,
                        event_type = %event.event_type,
                        "Event published"
                    );
                    Ok(())
                }
                Err((kafka_error, _)) => Err(EventBusError::PublishFailed {
                    topic,
                    reason: kafka_error.to_string(),
                }),
            }
        })
    }

    fn subscribe(&self, topics: &[&str]) -> EventBusFuture<'_, EventStream> {
        let topics: Vec<String> = topics.iter().map(|s| (*s).to_string()).collect();
        let brokers = self.brokers.clone();
        let consumer_group = self.consumer_group.clone();
        let buffer_size = self.buffer_size;
        let auto_offset_reset = self.auto_offset_reset.clone();

        Box::pin(async move {
            let consumer_group_id = consumer_group.unwrap_or_else(|| {
                let mut sorted_topics = topics.clone();
                sorted_topics.sort();
                format!("microshop-{}", sorted_topics.join("-"))
            });

            // Manual commit for at-least-once
            let consumer: StreamConsumer = ClientConfig::new()
                .set("bootstrap.servers", &brokers)
                .set("group.id", &consumer_group_id)
                .set("enable.auto.commit", "false")
                .set("auto.offset.reset", &auto_offset_reset)
                .set("session.timeout.ms", "6000")
                .set("enable.partition.eof", "false")
                .create()
                .map_err(|e| EventBusError::SubscriptionFailed {
                    topics: topics.clone(),
                    reason: format!("Failed to create consumer: {e}"),
                })?;

            let topic_refs: Vec<&str> = topics.iter().map(String::as_str).collect();
            consumer
                .subscribe(&topic_refs)
                .map_err(|e| EventBusError::SubscriptionFailed {
                    topics: topics.clone(),
                    reason: format!("Failed to subscribe to topics: {e}"),
                })?;

            tracing::info!(
                topics = ?topics,
                consumer_group = %consumer_group_id,
                buffer_size = buffer_size,
                auto_offset_reset = %auto_offset_reset,
                "Subscribed to topics"
            );

            let (tx, rx) = tokio::sync::mpsc::channel(buffer_size);

            // The task owns the consumer and forwards messages
            tokio::spawn(async move {
                use futures::StreamExt;
                use rdkafka::consumer::CommitMode;

                let mut stream = consumer.stream();

                while let Some(msg_result) = stream.next().await {
                    match msg_result {
                        Ok(message) => {
                            let event_result = decode_message(&message);
                            if let Ok(event) = &event_result {
                                tracing::trace!(
                                    topic = message.topic(),
                                    partition = message.partition(),
                                    offset = message.offset(),
                                    event_type = %event.event_type,
                                    "Received event"
                                );
                            }

                            // Only commit AFTER successful send to channel
                            if tx.send(event_result).await.is_err() {
                                tracing::debug!("Channel receiver dropped, exiting consumer task");
                                break;
                            }

                            if let Err(e) = consumer.commit_message(&message, CommitMode::Async) {
                                tracing::warn!(
                                    topic = message.topic(),
                                    partition = message.partition(),
                                    offset = message.offset(),
                                    error = %e,
                                    "Failed to commit offset (message may be redelivered)"
                                );
                            }
                        }
                        Err(e) => {
                            let err = EventBusError::TransportError(format!(
                                "Failed to receive message: {e}"
                            ));
                            if tx.send(Err(err)).await.is_err() {
                                break;
                            }
                        }
                    }
                }

                tracing::debug!("Consumer task exiting");
            });

            let stream = async_stream::stream! {
                let mut rx = rx;
                while let Some(result) = rx.recv().await {
                    yield result;
                }
            };

            Ok(Box::pin(stream) as EventStream)
        })
    }
}
