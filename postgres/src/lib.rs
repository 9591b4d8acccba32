//! `PostgreSQL` repositories for Microshop.
//!
//! This crate implements the repository traits from `microshop-core` on top of
//! a sqlx [`PgPool`]:
//!
//! - [`PostgresOrderRepository`]: insert-only `orders` table
//! - [`PostgresUserRepository`]: CRUD over the `users` table
//!
//! Identifiers come from `BIGSERIAL` columns and `orders.created_at` from a
//! UTC column default, so both are assigned by the database and read back
//! with `RETURNING`. Each service owns one database and creates only its own
//! table: [`migrate_orders`] or [`migrate_users`].
//!
//! # Example
//!
//! ```ignore
//! use microshop_postgres::{PostgresConfig, PostgresOrderRepository, connect, migrate_orders};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = connect(&PostgresConfig::from_env("postgres://localhost/orders")).await?;
//!     migrate_orders(&pool).await?;
//!     let orders = PostgresOrderRepository::new(pool);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod orders;
mod users;

pub use orders::PostgresOrderRepository;
pub use users::PostgresUserRepository;

use microshop_core::repository::RepositoryError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::env;
use std::time::Duration;

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Database URL
    pub url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Minimum connections in pool
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout: u64,
}

impl PostgresConfig {
    /// Read `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`,
    /// `DATABASE_MIN_CONNECTIONS` and `DATABASE_CONNECT_TIMEOUT`, falling back
    /// to `default_url` and 10 / 1 / 30.
    #[must_use]
    pub fn from_env(default_url: &str) -> Self {
        Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| default_url.to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            connect_timeout: env::var("DATABASE_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Open a connection pool.
///
/// # Errors
///
/// Returns the sqlx error if no connection can be established within
/// `connect_timeout`.
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Create the `orders` table if it does not exist yet.
///
/// `created_at` defaults to the current UTC wall-clock time, stored without
/// an offset.
///
/// # Errors
///
/// Returns the sqlx error if the statement fails.
pub async fn migrate_orders(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            total NUMERIC(19, 2) NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT (CURRENT_TIMESTAMP AT TIME ZONE 'UTC')
        )
        ",
    )
    .execute(pool)
    .await?;

    tracing::debug!(table = "orders", "Schema ready");
    Ok(())
}

/// Create the `users` table if it does not exist yet.
///
/// # Errors
///
/// Returns the sqlx error if the statement fails.
pub async fn migrate_users(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    tracing::debug!(table = "users", "Schema ready");
    Ok(())
}

fn database_error(error: &sqlx::Error) -> RepositoryError {
    tracing::error!(error = %error, "Database operation failed");
    RepositoryError::Database(error.to_string())
}
