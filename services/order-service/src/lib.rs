//! # Order Service
//!
//! Stores orders and announces each new one on the event bus.
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/api/orders` | 200, all orders | 500 |
//! | POST | `/api/orders` | 201, stored order | 400, 500 |
//! | GET | `/health` | 200 `{"status":"UP"}` | |
//!
//! A successful `POST` publishes one `order.created` event, keyed by its
//! event type, to the configured topic (`orders.ex` by default):
//!
//! ```text
//! { "event": "order.created", "version": "1.0",
//!   "orderId": 1, "userId": 7, "total": 19.99,
//!   "timestamp": "2025-01-01T00:00:00" }
//! ```
//!
//! # Known weak point
//!
//! Persisting and publishing are not atomic. The event is built from the
//! stored record and sent on a background task without retries, so a broker
//! outage or a crash right after the insert leaves an order with no event.
//! See [`OrderService`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod publisher;
pub mod service;

pub use api::router;
pub use config::Config;
pub use publisher::OrderPublisher;
pub use service::OrderService;
