//! `order.created` consumer.

use crate::metrics::{ORDERS_PROCESSED_TOTAL, ORDERS_REJECTED_TOTAL};
use futures::StreamExt;
use microshop_core::OrderEvent;
use microshop_core::event::{EventError, SerializedEvent};
use microshop_core::event_bus::{EventBus, EventBusError, EventStream};
use microshop_core::order_event::EVENT_TYPE;
use thiserror::Error;

/// Why a message was not processed.
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// The topic could not be subscribed to.
    #[error("subscription failed: {0}")]
    Subscribe(#[from] EventBusError),

    /// The message key names an event this consumer does not handle.
    #[error("unexpected event type: {0}")]
    UnexpectedEventType(String),

    /// The payload is not a valid `OrderEvent`.
    #[error(transparent)]
    Decode(#[from] EventError),
}

/// What became of one stream item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Decoded and counted.
    Processed,
    /// Skipped as malformed.
    Rejected,
    /// The bus reported a transport problem; nothing was consumed.
    TransportError,
}

/// What a finished [`OrderConsumer::run`] saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Events processed.
    pub processed: u64,
    /// Messages skipped as malformed.
    pub rejected: u64,
    /// Transport errors reported by the stream.
    pub transport_errors: u64,
}

/// Reads `order.created` events and counts them.
///
/// A message without a key is judged by its payload alone. Malformed
/// messages, including ones the bus could not turn into an envelope, are
/// logged, counted as rejected and skipped; the underlying subscription
/// commits them like any other message, so they are never redelivered.
#[derive(Debug, Clone, Default)]
pub struct OrderConsumer;

impl OrderConsumer {
    /// Create a consumer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Handle a single message.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumerError::UnexpectedEventType`] or
    /// [`ConsumerError::Decode`] for messages that are skipped.
    pub fn process(&self, message: &SerializedEvent) -> Result<OrderEvent, ConsumerError> {
        let outcome = decode(message);

        match &outcome {
            Ok(event) => {
                tracing::info!(
                    order_id = %event.order_id,
                    user_id = %event.user_id,
                    total = %event.total,
                    "Processing order"
                );
                metrics::counter!(ORDERS_PROCESSED_TOTAL).increment(1);
            }
            Err(e) => {
                tracing::error!(
                    event_type = %message.event_type,
                    error = %e,
                    "Skipping malformed order message"
                );
                metrics::counter!(ORDERS_REJECTED_TOTAL).increment(1);
            }
        }

        outcome
    }

    /// Handle one item of a subscription stream.
    pub fn handle(&self, item: Result<SerializedEvent, EventBusError>) -> Outcome {
        match item {
            Ok(message) => match self.process(&message) {
                Ok(_) => Outcome::Processed,
                Err(_) => Outcome::Rejected,
            },
            Err(EventBusError::DeserializationFailed(reason)) => {
                tracing::error!(reason = %reason, "Skipping undecodable message");
                metrics::counter!(ORDERS_REJECTED_TOTAL).increment(1);
                Outcome::Rejected
            }
            Err(e) => {
                tracing::error!(error = %e, "Event stream error");
                Outcome::TransportError
            }
        }
    }

    /// Process `stream` until it ends.
    pub async fn run(&self, mut stream: EventStream) -> ConsumerStats {
        let mut stats = ConsumerStats::default();

        while let Some(item) = stream.next().await {
            match self.handle(item) {
                Outcome::Processed => stats.processed += 1,
                Outcome::Rejected => stats.rejected += 1,
                Outcome::TransportError => stats.transport_errors += 1,
            }
        }

        tracing::info!(
            processed = stats.processed,
            rejected = stats.rejected,
            "Order stream ended"
        );
        stats
    }

    /// Subscribe to `topic` on `bus` and process it until the stream ends.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumerError::Subscribe`] if the subscription fails.
    pub async fn consume(&self, bus: &dyn EventBus, topic: &str) -> Result<ConsumerStats, ConsumerError> {
        let stream = bus.subscribe(&[topic]).await?;
        tracing::info!(topic, "Subscribed to order events");
        Ok(self.run(stream).await)
    }
}

fn decode(message: &SerializedEvent) -> Result<OrderEvent, ConsumerError> {
    if !message.event_type.is_empty() && message.event_type != EVENT_TYPE {
        return Err(ConsumerError::UnexpectedEventType(message.event_type.clone()));
    }
    Ok(message.decode::<OrderEvent>()?)
}
