//! Event trait and the serialized envelope handed to the event bus.
//!
//! Events are facts about things that already happened. They are immutable
//! and leave the process as JSON, because consumers of the broker are not
//! necessarily Rust services.
//!
//! # Example
//!
//! ```
//! use microshop_core::event::{Event, SerializedEvent};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! struct UserRenamed {
//!     user_id: i64,
//!     name: String,
//! }
//!
//! impl Event for UserRenamed {
//!     fn event_type(&self) -> &'static str {
//!         "user.renamed"
//!     }
//! }
//!
//! let event = UserRenamed { user_id: 1, name: "Ada".to_string() };
//! let serialized = SerializedEvent::from_event(&event, None).unwrap();
//! assert_eq!(serialized.event_type, "user.renamed");
//! ```

use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error;

/// Error types for event operations.
#[derive(Error, Debug)]
pub enum EventError {
    /// Failed to serialize event to bytes.
    #[error("Failed to serialize event: {0}")]
    SerializationError(String),

    /// Failed to deserialize event from bytes.
    #[error("Failed to deserialize event: {0}")]
    DeserializationError(String),

    /// Received an event of a type this consumer does not handle.
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),
}

/// An event that can be published on the event bus.
///
/// # Event Naming Convention
///
/// `event_type()` returns the stable, dotted name consumers route on
/// (`"order.created"`). It doubles as the broker message key, so events of
/// one type land on one partition and keep their relative order.
///
/// # Thread Safety
///
/// Events must be `Send + Sync + 'static` so they can be moved into spawned
/// publish tasks.
pub trait Event: Send + Sync + 'static {
    /// Returns the event type identifier for this event.
    fn event_type(&self) -> &'static str;

    /// Serialize this event to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `EventError::SerializationError` if the event cannot be serialized.
    fn to_bytes(&self) -> Result<Vec<u8>, EventError>
    where
        Self: Serialize,
    {
        serde_json::to_vec(self).map_err(|e| EventError::SerializationError(e.to_string()))
    }

    /// Deserialize an event from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `EventError::DeserializationError` if the bytes are not valid
    /// JSON for this event type.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EventError>
    where
        Self: DeserializeOwned + Sized,
    {
        serde_json::from_slice(bytes).map_err(|e| EventError::DeserializationError(e.to_string()))
    }
}

/// A serialized event ready for the wire.
///
/// This struct contains the event type name and the serialized bytes, along
/// with optional metadata. It is the unit the [`EventBus`](crate::event_bus::EventBus)
/// publishes and delivers.
#[derive(Clone, Debug, PartialEq)]
pub struct SerializedEvent {
    /// The event type identifier (e.g., "order.created"). Empty when the
    /// message arrived without a usable key.
    pub event_type: String,

    /// The JSON-encoded event body.
    pub data: Vec<u8>,

    /// Optional metadata, carried as message headers.
    ///
    /// Common metadata fields:
    /// - `correlation_id`: the HTTP request that caused the event
    pub metadata: Option<serde_json::Value>,
}

impl SerializedEvent {
    /// Create a new serialized event.
    ///
    /// # Examples
    ///
    /// ```
    /// use microshop_core::event::SerializedEvent;
    ///
    /// let event = SerializedEvent::new(
    ///     "order.created".to_string(),
    ///     br#"{"orderId":1}"#.to_vec(),
    ///     None,
    /// );
    /// assert_eq!(event.data.len(), 13);
    /// ```
    #[must_use]
    pub const fn new(
        event_type: String,
        data: Vec<u8>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            event_type,
            data,
            metadata,
        }
    }

    /// Create a serialized event from an `Event`.
    ///
    /// # Errors
    ///
    /// Returns `EventError::SerializationError` if the event cannot be serialized.
    pub fn from_event<E: Event + Serialize>(
        event: &E,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, EventError> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            data: event.to_bytes()?,
            metadata,
        })
    }

    /// Decode the payload as a concrete event.
    ///
    /// # Errors
    ///
    /// Returns `EventError::DeserializationError` if the payload does not
    /// match `E`.
    pub fn decode<E: Event + DeserializeOwned>(&self) -> Result<E, EventError> {
        E::from_bytes(&self.data)
    }
}

impl fmt::Display for SerializedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SerializedEvent {{ type: {}, size: {} bytes }}",
            self.event_type,
            self.data.len()
        )
    }
}
