//! The `order.created` notification.
//!
//! This is a wire contract shared with every consumer of the orders topic.
//! The JSON shape is fixed:
//!
//! ```text
//! { "event": "order.created", "version": "1.0",
//!   "orderId": 1, "userId": 7, "total": 19.99,
//!   "timestamp": "2025-01-01T00:00:00" }
//! ```

use crate::event::Event;
use crate::money::Money;
use crate::order::{Order, OrderId};
use crate::user::UserId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Event type tag, also used as the message key.
pub const EVENT_TYPE: &str = "order.created";

/// Schema version of [`OrderEvent`].
pub const SCHEMA_VERSION: &str = "1.0";

/// Default topic the order service publishes to.
pub const ORDERS_EXCHANGE: &str = "orders.ex";

/// Published once per stored order.
///
/// There is no public constructor taking loose fields: the only way to build
/// one outside deserialization is [`OrderEvent::created`], which needs an
/// [`Order`] returned by a repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    /// Always [`EVENT_TYPE`] for events built here.
    pub event: String,
    /// Always [`SCHEMA_VERSION`] for events built here.
    pub version: String,
    /// Id of the stored order.
    pub order_id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Order total.
    pub total: Money,
    /// The order's `created_at`.
    pub timestamp: NaiveDateTime,
}

impl OrderEvent {
    /// Describe a stored order.
    #[must_use]
    pub fn created(order: &Order) -> Self {
        Self {
            event: EVENT_TYPE.to_string(),
            version: SCHEMA_VERSION.to_string(),
            order_id: order.id,
            user_id: order.user_id,
            total: order.total,
            timestamp: order.created_at,
        }
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        EVENT_TYPE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::SerializedEvent;
    use chrono::{DateTime, NaiveDate};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn stored_order() -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(7),
            total: Money::from_str("19.99").unwrap(),
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn serializes_to_the_published_shape() {
        let event = OrderEvent::created(&stored_order());

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "event": "order.created",
                "version": "1.0",
                "orderId": 1,
                "userId": 7,
                "total": 19.99,
                "timestamp": "2025-01-01T00:00:00"
            })
        );
    }

    #[test]
    fn envelope_is_keyed_by_event_type() {
        let serialized =
            SerializedEvent::from_event(&OrderEvent::created(&stored_order()), None).unwrap();

        assert_eq!(serialized.event_type, "order.created");
        assert_eq!(
            serialized.decode::<OrderEvent>().unwrap(),
            OrderEvent::created(&stored_order())
        );
    }

    #[test]
    fn parses_payload_from_other_producers() {
        let payload = br#"{"event":"order.created","version":"1.0","orderId":3,
            "userId":4,"total":5.5,"timestamp":"2025-03-04T05:06:07.123"}"#;

        let event = OrderEvent::from_bytes(payload).unwrap();

        assert_eq!(event.order_id, OrderId::new(3));
        assert_eq!(event.total, Money::from_str("5.5").unwrap());
        assert_eq!(event.timestamp.to_string(), "2025-03-04 05:06:07.123");
    }

    proptest! {
        #[test]
        fn copies_every_field_from_the_stored_order(
            id in 1_i64..i64::MAX,
            user in 1_i64..i64::MAX,
            cents in 0_i64..1_000_000_000_000,
            secs in 0_i64..4_000_000_000,
        ) {
            let order = Order {
                id: OrderId::new(id),
                user_id: UserId::new(user),
                total: Money::new(Decimal::new(cents, 2)),
                created_at: DateTime::from_timestamp(secs, 0).unwrap().naive_utc(),
            };

            let event = OrderEvent::created(&order);

            prop_assert_eq!(event.event.as_str(), EVENT_TYPE);
            prop_assert_eq!(event.version.as_str(), SCHEMA_VERSION);
            prop_assert_eq!(event.order_id, order.id);
            prop_assert_eq!(event.user_id, order.user_id);
            prop_assert_eq!(event.total, order.total);
            prop_assert_eq!(event.timestamp, order.created_at);
        }
    }
}
