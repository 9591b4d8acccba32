//! # Analytics Consumer
//!
//! Joins consumer group `orders.q` on topic `orders.ex` and processes each
//! `order.created` event by logging it and incrementing
//! `orders_processed_total`. Messages that fail to decode are logged at
//! `error` and skipped.
//!
//! Offsets are committed by the subscription after each message is handed
//! over, so delivery is at-least-once.
//!
//! HTTP (port 8082 by default):
//!
//! - `GET /health` returns `{"status":"UP"}`
//! - `GET /metrics` returns Prometheus text

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod consumer;
pub mod metrics;

pub use api::router;
pub use config::Config;
pub use consumer::{ConsumerError, ConsumerStats, OrderConsumer, Outcome};
