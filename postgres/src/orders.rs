//! `orders` table.

use crate::database_error;
use microshop_core::repository::{OrderRepository, RepositoryFuture};
use microshop_core::{Decimal, NaiveDateTime, NewOrder, Order, OrderId, UserId};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// [`OrderRepository`] backed by the `orders` table.
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, sqlx::Error> {
    Ok(Order {
        id: OrderId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        total: row.try_get::<Decimal, _>("total")?.into(),
        created_at: row.try_get::<NaiveDateTime, _>("created_at")?,
    })
}

impl OrderRepository for PostgresOrderRepository {
    fn find_all(&self) -> RepositoryFuture<'_, Vec<Order>> {
        Box::pin(async move {
            let rows = sqlx::query("SELECT id, user_id, total, created_at FROM orders ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| database_error(&e))?;

            rows.iter()
                .map(order_from_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| database_error(&e))
        })
    }

    fn save(&self, order: NewOrder) -> RepositoryFuture<'_, Order> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                INSERT INTO orders (user_id, total)
                VALUES ($1, $2)
                RETURNING id, user_id, total, created_at
                ",
            )
            .bind(order.user_id.get())
            .bind(Decimal::from(order.total))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error(&e))?;

            let stored = order_from_row(&row).map_err(|e| database_error(&e))?;
            tracing::debug!(order_id = %stored.id, "Order inserted");
            Ok(stored)
        })
    }
}
