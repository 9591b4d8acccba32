//! Persistence ports for orders and users.
//!
//! Services receive these as `Arc<dyn OrderRepository>` / `Arc<dyn UserRepository>`.
//! The Postgres implementations live in `microshop-postgres`; in-memory
//! doubles live in `microshop-testing`.

use crate::order::{NewOrder, Order};
use crate::user::{User, UserId, UserProfile};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors returned by repositories.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No record with the given identifier exists.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name, e.g. `"user"`.
        entity: &'static str,
        /// The identifier that was looked up.
        id: i64,
    },

    /// The store failed (connection lost, constraint violated, ...).
    #[error("database error: {0}")]
    Database(String),
}

/// Boxed future returned by repository methods.
pub type RepositoryFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Store of orders.
///
/// Orders are insert-only.
pub trait OrderRepository: Send + Sync {
    /// All orders, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the store cannot be read.
    fn find_all(&self) -> RepositoryFuture<'_, Vec<Order>>;

    /// Insert an order. The store assigns `id` and `created_at` and the
    /// stored record is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the write fails.
    fn save(&self, order: NewOrder) -> RepositoryFuture<'_, Order>;
}

/// Store of users.
pub trait UserRepository: Send + Sync {
    /// All users, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the store cannot be read.
    fn find_all(&self) -> RepositoryFuture<'_, Vec<User>>;

    /// The user with `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the store cannot be read.
    fn find_by_id(&self, id: UserId) -> RepositoryFuture<'_, Option<User>>;

    /// Insert a user with a store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the write fails.
    fn insert(&self, profile: UserProfile) -> RepositoryFuture<'_, User>;

    /// Overwrite the name and email of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no user has `user.id`, or
    /// [`RepositoryError::Database`] if the write fails.
    fn update(&self, user: User) -> RepositoryFuture<'_, User>;

    /// Remove the user with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no user has `id`, or
    /// [`RepositoryError::Database`] if the delete fails.
    fn delete_by_id(&self, id: UserId) -> RepositoryFuture<'_, ()>;
}
