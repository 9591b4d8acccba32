//! Best-effort publication of `order.created`.

use microshop_core::event::SerializedEvent;
use microshop_core::event_bus::EventBus;
use microshop_core::{Order, OrderEvent};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Turns stored orders into [`OrderEvent`]s and hands them to the event bus.
///
/// Publication is fire-and-forget: the send runs on a spawned task, is never
/// retried, and a failure only produces a `warn` log. An order whose event
/// is lost stays stored.
#[derive(Clone)]
pub struct OrderPublisher {
    bus: Arc<dyn EventBus>,
    topic: String,
}

impl OrderPublisher {
    /// Publish to `topic` through `bus`.
    #[must_use]
    pub fn new(bus: Arc<dyn EventBus>, topic: impl Into<String>) -> Self {
        Self {
            bus,
            topic: topic.into(),
        }
    }

    /// The topic events go to.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Start publishing the creation event for `order`.
    ///
    /// Returns the handle of the spawned send, or `None` when the event
    /// could not even be serialized. Callers are free to drop the handle.
    pub fn publish_created(&self, order: &Order, correlation_id: Option<Uuid>) -> Option<JoinHandle<()>> {
        let event = OrderEvent::created(order);
        let metadata =
            correlation_id.map(|id| serde_json::json!({ "correlation_id": id.to_string() }));

        let serialized = match SerializedEvent::from_event(&event, metadata) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Could not serialize order event");
                return None;
            }
        };

        let bus = Arc::clone(&self.bus);
        let topic = self.topic.clone();
        let order_id = order.id;

        Some(tokio::spawn(async move {
            match bus.publish(&topic, &serialized).await {
                Ok(()) => {
                    tracing::debug!(order_id = %order_id, topic = %topic, "Order event published");
                }
                Err(e) => {
                    tracing::warn!(
                        order_id = %order_id,
                        topic = %topic,
                        error = %e,
                        "Order event lost"
                    );
                }
            }
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use microshop_core::{Money, OrderId, UserId};
    use microshop_testing::{RecordingEventBus, test_clock};
    use microshop_core::environment::Clock;
    use std::str::FromStr;

    fn order() -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(7),
            total: Money::from_str("19.99").unwrap(),
            created_at: test_clock().now().naive_utc(),
        }
    }

    #[tokio::test]
    async fn publishes_to_the_configured_topic_with_correlation_metadata() {
        let bus = Arc::new(RecordingEventBus::new());
        let publisher = OrderPublisher::new(bus.clone(), "orders.ex");
        let correlation_id = Uuid::new_v4();

        publisher
            .publish_created(&order(), Some(correlation_id))
            .unwrap()
            .await
            .unwrap();

        let published = bus.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].topic, "orders.ex");
        assert_eq!(published[0].event.event_type, "order.created");
        assert_eq!(
            published[0].event.metadata,
            Some(serde_json::json!({ "correlation_id": correlation_id.to_string() }))
        );
        assert_eq!(
            published[0].event.decode::<OrderEvent>().unwrap(),
            OrderEvent::created(&order())
        );
    }

    #[tokio::test]
    async fn failed_publish_is_swallowed() {
        let bus = Arc::new(RecordingEventBus::failing("broker down"));
        let publisher = OrderPublisher::new(bus.clone(), "orders.ex");

        let handle = publisher.publish_created(&order(), None).unwrap();

        assert!(handle.await.is_ok());
        assert_eq!(bus.publish_attempts(), 1);
        assert!(bus.published().is_empty());
    }
}
