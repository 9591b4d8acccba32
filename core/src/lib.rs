//! # Microshop Core
//!
//! Core traits and types shared by the Microshop services.
//!
//! This crate holds everything the services agree on and nothing that talks
//! to the outside world:
//!
//! - **Entities**: [`Order`](order::Order) and [`User`](user::User), plus their
//!   unsaved counterparts [`NewOrder`](order::NewOrder) and
//!   [`UserProfile`](user::UserProfile)
//! - **Events**: the [`OrderEvent`](order_event::OrderEvent) wire contract and
//!   the [`SerializedEvent`](event::SerializedEvent) envelope
//! - **Ports**: [`OrderRepository`](repository::OrderRepository),
//!   [`UserRepository`](repository::UserRepository) and
//!   [`EventBus`](event_bus::EventBus), injected into services as trait objects
//! - **Errors**: the [`ServiceError`](error::ServiceError) taxonomy surfaced to
//!   HTTP callers
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │  HTTP shell  │ ──► │  Service (core   │ ──► │   Repository    │
//! │  (axum)      │     │  types + ports)  │     │   (Postgres)    │
//! └──────────────┘     └────────┬─────────┘     └─────────────────┘
//!                               │
//!                               ▼
//!                      ┌──────────────────┐
//!                      │    Event bus     │
//!                      │   (Redpanda)     │
//!                      └──────────────────┘
//! ```
//!
//! Implementations live in sibling crates: `microshop-postgres`,
//! `microshop-redpanda`, and `microshop-testing` (in-memory doubles).

// Re-export commonly used types
pub use chrono::NaiveDateTime;
pub use rust_decimal::Decimal;

pub mod environment;
pub mod error;
pub mod event;
pub mod event_bus;
pub mod money;
pub mod order;
pub mod order_event;
pub mod repository;
pub mod user;

pub use error::ServiceError;
pub use money::Money;
pub use order::{NewOrder, Order, OrderId};
pub use order_event::OrderEvent;
pub use repository::{OrderRepository, RepositoryError, UserRepository};
pub use user::{User, UserId, UserProfile};
