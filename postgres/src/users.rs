//! `users` table.

use crate::database_error;
use microshop_core::repository::{RepositoryError, RepositoryFuture, UserRepository};
use microshop_core::{User, UserId, UserProfile};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// [`UserRepository`] backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

const fn not_found(id: UserId) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "user",
        id: id.get(),
    }
}

impl UserRepository for PostgresUserRepository {
    fn find_all(&self) -> RepositoryFuture<'_, Vec<User>> {
        Box::pin(async move {
            let rows = sqlx::query("SELECT id, name, email FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| database_error(&e))?;

            rows.iter()
                .map(user_from_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| database_error(&e))
        })
    }

    fn find_by_id(&self, id: UserId) -> RepositoryFuture<'_, Option<User>> {
        Box::pin(async move {
            let row = sqlx::query("SELECT id, name, email FROM users WHERE id = $1")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error(&e))?;

            row.as_ref()
                .map(user_from_row)
                .transpose()
                .map_err(|e| database_error(&e))
        })
    }

    fn insert(&self, profile: UserProfile) -> RepositoryFuture<'_, User> {
        Box::pin(async move {
            let row = sqlx::query(
                "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
            )
            .bind(&profile.name)
            .bind(&profile.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error(&e))?;

            user_from_row(&row).map_err(|e| database_error(&e))
        })
    }

    fn update(&self, user: User) -> RepositoryFuture<'_, User> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                UPDATE users SET name = $2, email = $3
                WHERE id = $1
                RETURNING id, name, email
                ",
            )
            .bind(user.id.get())
            .bind(&user.name)
            .bind(&user.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error(&e))?;

            match row {
                Some(row) => user_from_row(&row).map_err(|e| database_error(&e)),
                None => Err(not_found(user.id)),
            }
        })
    }

    fn delete_by_id(&self, id: UserId) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(|e| database_error(&e))?;

            if result.rows_affected() == 0 {
                return Err(not_found(id));
            }
            Ok(())
        })
    }
}
