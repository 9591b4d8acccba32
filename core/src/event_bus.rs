//! Event bus abstraction for service-to-service notifications.
//!
//! This module provides the [`EventBus`] trait for publishing and subscribing to
//! events. The order service publishes `order.created` after an order has been
//! stored; the analytics consumer subscribes to the same topic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  POST /orders   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  1. Save order  │
//! │   to Postgres   │◄─── Source of truth
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ 2. Publish to   │
//! │    Event Bus    │◄─── Fire-and-forget, no retry
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Analytics    │
//! │    consumer     │
//! └─────────────────┘
//! ```
//!
//! # Key Principles
//!
//! - **Postgres first**: an order is stored before its event is built
//! - **At-least-once delivery** on the consuming side (manual commits)
//! - **Ordered within partition**: events sharing a key keep their order
//!
//! # Implementations
//!
//! - `RecordingEventBus` in `microshop-testing`: records publishes in memory
//! - `RedpandaEventBus` in `microshop-redpanda`: Kafka-compatible broker
//!
//! # Example
//!
//! ```rust,ignore
//! use microshop_core::event_bus::EventBus;
//! use microshop_core::event::SerializedEvent;
//! use futures::StreamExt;
//!
//! async fn example(event_bus: impl EventBus) {
//!     let event = SerializedEvent::new("order.created".to_string(), payload, None);
//!     event_bus.publish("orders.ex", &event).await?;
//!
//!     let mut stream = event_bus.subscribe(&["orders.ex"]).await?;
//!     while let Some(result) = stream.next().await {
//!         match result {
//!             Ok(event) => println!("Received: {}", event.event_type),
//!             Err(e) => eprintln!("Error: {e}"),
//!         }
//!     }
//! }
//! ```

use crate::event::SerializedEvent;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during event bus operations.
#[derive(Error, Debug, Clone)]
pub enum EventBusError {
    /// Failed to connect to the event bus
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Failed to publish an event to a topic
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Failed to subscribe to topics
    #[error("Subscription failed for topics {topics:?}: {reason}")]
    SubscriptionFailed {
        /// The topics that failed to subscribe
        topics: Vec<String>,
        /// The reason for failure
        reason: String,
    },

    /// A message arrived without a usable key or payload
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Consumer group error
    #[error("Consumer group error: {0}")]
    ConsumerGroupError(String),

    /// Network or transport error
    #[error("Transport error: {0}")]
    TransportError(String),
}

/// Stream of events from subscriptions.
///
/// Each item is a `Result`: transport problems are delivered in-band so the
/// subscriber can log them and keep reading.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<SerializedEvent, EventBusError>> + Send>>;

/// Boxed future returned by [`EventBus`] methods.
pub type EventBusFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, EventBusError>> + Send + 'a>>;

/// Trait for event bus implementations.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single bus is shared by every
/// request handler through an `Arc<dyn EventBus>`.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// so it can be used as a trait object.
pub trait EventBus: Send + Sync {
    /// Publish an event to a topic.
    ///
    /// The event's `event_type` is used as the message key.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::PublishFailed`] if the broker rejects the
    /// message or the delivery times out.
    fn publish(&self, topic: &str, event: &SerializedEvent) -> EventBusFuture<'_, ()>;

    /// Subscribe to one or more topics and receive a stream of events.
    ///
    /// Implementations use a consumer group, so several instances of the
    /// same subscriber share the partitions between them.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::SubscriptionFailed`] if subscription fails.
    fn subscribe(&self, topics: &[&str]) -> EventBusFuture<'_, EventStream>;
}
