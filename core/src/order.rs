//! Order entity.
//!
//! An order exists in two shapes:
//!
//! - [`NewOrder`]: what a caller asks for (user and total). It has no
//!   identifier and no timestamp, so nothing downstream can mistake it for a
//!   stored record.
//! - [`Order`]: what the repository hands back after insert, carrying the
//!   server-assigned [`OrderId`] and `created_at`.

use crate::money::Money;
use crate::user::UserId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned order identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An order that has not been persisted yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrder {
    /// The user placing the order.
    pub user_id: UserId,
    /// Order total.
    pub total: Money,
}

impl NewOrder {
    /// Create a new unsaved order.
    #[must_use]
    pub const fn new(user_id: UserId, total: Money) -> Self {
        Self { user_id, total }
    }
}

/// A persisted order.
///
/// Serializes as `{"id":1,"userId":7,"total":19.99,"createdAt":"2025-01-01T00:00:00"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned identifier.
    pub id: OrderId,
    /// The user who placed the order (not checked against the user service).
    pub user_id: UserId,
    /// Order total.
    pub total: Money,
    /// Store-assigned creation time: UTC wall-clock time without an offset.
    pub created_at: NaiveDateTime,
}
