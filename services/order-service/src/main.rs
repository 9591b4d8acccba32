//! Order service HTTP server.

use microshop_core::event_bus::EventBus;
use microshop_postgres::PostgresOrderRepository;
use microshop_redpanda::RedpandaEventBus;
use order_service::{Config, OrderPublisher, OrderService, router};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,order_service=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting order service");

    let config = Config::from_env();
    info!(
        address = %config.server.address(),
        redpanda_brokers = %config.redpanda.brokers,
        topic = %config.redpanda.orders_exchange,
        "Configuration loaded"
    );

    let pool = microshop_postgres::connect(&config.postgres).await?;
    microshop_postgres::migrate_orders(&pool).await?;

    let event_bus: Arc<dyn EventBus> = Arc::new(RedpandaEventBus::from_config(&config.redpanda)?);
    let publisher = OrderPublisher::new(event_bus, config.redpanda.orders_exchange.clone());
    let service = Arc::new(OrderService::new(
        Arc::new(PostgresOrderRepository::new(pool)),
        publisher,
    ));

    let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
    info!(address = %config.server.address(), "Server listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(microshop_web::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
