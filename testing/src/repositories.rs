//! In-memory repositories.
//!
//! Records live in a `BTreeMap` keyed by id, so iteration order matches the
//! ascending-id order of the Postgres implementations. Ids start at 1.
//!
//! Both stores can be switched into a failing mode with `fail_with`, after
//! which every call returns [`RepositoryError::Database`] and leaves the data
//! untouched.

#![allow(clippy::missing_panics_doc)]

use microshop_core::environment::Clock;
use microshop_core::repository::{
    OrderRepository, RepositoryError, RepositoryFuture, UserRepository,
};
use microshop_core::{NewOrder, Order, OrderId, User, UserId, UserProfile};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

fn poisoned() -> RepositoryError {
    RepositoryError::Database("in-memory store lock poisoned".to_string())
}

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
    failure: Option<String>,
    writes: usize,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
            failure: None,
            writes: 0,
        }
    }
}

impl<T> Table<T> {
    fn check(&self) -> Result<(), RepositoryError> {
        match &self.failure {
            Some(reason) => Err(RepositoryError::Database(reason.clone())),
            None => Ok(()),
        }
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory [`OrderRepository`].
///
/// `created_at` is the injected clock's UTC wall-clock time without an
/// offset, matching the `orders.created_at` column default. Totals are
/// rounded to two decimal places, as the `NUMERIC(19, 2)` column would do.
///
/// # Example
///
/// ```
/// use microshop_core::{Money, NewOrder, UserId};
/// use microshop_core::repository::OrderRepository;
/// use microshop_testing::{InMemoryOrderRepository, test_clock};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryOrderRepository::new(Arc::new(test_clock()));
/// let order = repo.save(NewOrder::new(UserId::new(7), Money::ZERO)).await?;
/// assert_eq!(order.id.get(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    table: Arc<Mutex<Table<Order>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryOrderRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::default())),
            clock,
        }
    }

    /// Make every subsequent call fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        if let Ok(mut table) = self.table.lock() {
            table.failure = Some(reason.into());
        }
    }

    /// Number of successful inserts.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.table.lock().map(|t| t.writes).unwrap_or_default()
    }

    /// Snapshot of the stored orders, ascending by id.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.table
            .lock()
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn find_all(&self) -> RepositoryFuture<'_, Vec<Order>> {
        Box::pin(async move {
            let table = self.table.lock().map_err(|_| poisoned())?;
            table.check()?;
            Ok(table.rows.values().cloned().collect())
        })
    }

    fn save(&self, order: NewOrder) -> RepositoryFuture<'_, Order> {
        Box::pin(async move {
            let mut table = self.table.lock().map_err(|_| poisoned())?;
            table.check()?;
            let id = table.next_id();
            let stored = Order {
                id: OrderId::new(id),
                user_id: order.user_id,
                total: order.total.round_to(2),
                created_at: self.clock.now().naive_utc(),
            };
            table.rows.insert(id, stored.clone());
            table.writes += 1;
            Ok(stored)
        })
    }
}

/// In-memory [`UserRepository`].
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<Mutex<Table<User>>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        if let Ok(mut table) = self.table.lock() {
            table.failure = Some(reason.into());
        }
    }

    /// Number of successful inserts, updates and deletes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.table.lock().map(|t| t.writes).unwrap_or_default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_all(&self) -> RepositoryFuture<'_, Vec<User>> {
        Box::pin(async move {
            let table = self.table.lock().map_err(|_| poisoned())?;
            table.check()?;
            Ok(table.rows.values().cloned().collect())
        })
    }

    fn find_by_id(&self, id: UserId) -> RepositoryFuture<'_, Option<User>> {
        Box::pin(async move {
            let table = self.table.lock().map_err(|_| poisoned())?;
            table.check()?;
            Ok(table.rows.get(&id.get()).cloned())
        })
    }

    fn insert(&self, profile: UserProfile) -> RepositoryFuture<'_, User> {
        Box::pin(async move {
            let mut table = self.table.lock().map_err(|_| poisoned())?;
            table.check()?;
            let id = table.next_id();
            let user = User::from_profile(UserId::new(id), profile);
            table.rows.insert(id, user.clone());
            table.writes += 1;
            Ok(user)
        })
    }

    fn update(&self, user: User) -> RepositoryFuture<'_, User> {
        Box::pin(async move {
            let mut table = self.table.lock().map_err(|_| poisoned())?;
            table.check()?;
            let Some(row) = table.rows.get_mut(&user.id.get()) else {
                return Err(RepositoryError::NotFound {
                    entity: "user",
                    id: user.id.get(),
                });
            };
            *row = user.clone();
            table.writes += 1;
            Ok(user)
        })
    }

    fn delete_by_id(&self, id: UserId) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            let mut table = self.table.lock().map_err(|_| poisoned())?;
            table.check()?;
            if table.rows.remove(&id.get()).is_none() {
                return Err(RepositoryError::NotFound {
                    entity: "user",
                    id: id.get(),
                });
            }
            table.writes += 1;
            Ok(())
        })
    }
}
