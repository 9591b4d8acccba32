//! Recording event bus.
//!
//! Publishes are kept in memory, tagged with their topic. Subscribing
//! replays whatever was published to the requested topics so far, which is
//! enough to drive a consumer loop end-to-end in a unit test.

use futures::stream;
use microshop_core::event::SerializedEvent;
use microshop_core::event_bus::{EventBus, EventBusError, EventBusFuture, EventStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A publish captured by [`RecordingEventBus`].
#[derive(Clone, Debug, PartialEq)]
pub struct PublishedEvent {
    /// Topic the event was published to.
    pub topic: String,
    /// The event itself.
    pub event: SerializedEvent,
}

/// In-memory [`EventBus`] that records every successful publish.
///
/// Publishing happens on spawned tasks in the order service, so tests that
/// look for an event should use [`wait_for_published`](Self::wait_for_published)
/// rather than [`published`](Self::published).
#[derive(Clone, Debug, Default)]
pub struct RecordingEventBus {
    published: Arc<Mutex<Vec<PublishedEvent>>>,
    attempts: Arc<AtomicUsize>,
    failure: Arc<Mutex<Option<String>>>,
}

impl RecordingEventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus whose publishes always fail with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        let bus = Self::default();
        if let Ok(mut failure) = bus.failure.lock() {
            *failure = Some(reason.into());
        }
        bus
    }

    /// Successful publishes so far, in publish order.
    #[must_use]
    pub fn published(&self) -> Vec<PublishedEvent> {
        self.published
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Number of publish calls, successful or not.
    #[must_use]
    pub fn publish_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` publish attempts have been made or
    /// `timeout` elapses, then return the successful publishes.
    pub async fn wait_for_published(&self, count: usize, timeout: Duration) -> Vec<PublishedEvent> {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.publish_attempts() < count && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.published()
    }
}

impl EventBus for RecordingEventBus {
    fn publish(&self, topic: &str, event: &SerializedEvent) -> EventBusFuture<'_, ()> {
        let topic = topic.to_string();
        let event = event.clone();

        Box::pin(async move {
            let failure = self
                .failure
                .lock()
                .map_err(|_| EventBusError::TransportError("recorder lock poisoned".into()))?
                .clone();

            let result = match failure {
                Some(reason) => Err(EventBusError::PublishFailed { topic, reason }),
                None => {
                    self.published
                        .lock()
                        .map_err(|_| EventBusError::TransportError("recorder lock poisoned".into()))?
                        .push(PublishedEvent { topic, event });
                    Ok(())
                }
            };
            self.attempts.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    fn subscribe(&self, topics: &[&str]) -> EventBusFuture<'_, EventStream> {
        let topics: Vec<String> = topics.iter().map(|t| (*t).to_string()).collect();

        Box::pin(async move {
            let replay: Vec<Result<SerializedEvent, EventBusError>> = self
                .published()
                .into_iter()
                .filter(|p| topics.contains(&p.topic))
                .map(|p| Ok(p.event))
                .collect();
            let stream: EventStream = Box::pin(stream::iter(replay));
            Ok(stream)
        })
    }
}
