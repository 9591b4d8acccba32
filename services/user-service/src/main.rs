//! User service HTTP server.

use microshop_postgres::PostgresUserRepository;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_service::{Config, UserService, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,user_service=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting user service");

    let config = Config::from_env();
    info!(address = %config.server.address(), "Configuration loaded");

    let pool = microshop_postgres::connect(&config.postgres).await?;
    microshop_postgres::migrate_users(&pool).await?;

    let service = Arc::new(UserService::new(Arc::new(PostgresUserRepository::new(pool))));

    let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
    info!(address = %config.server.address(), "Server listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(microshop_web::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
