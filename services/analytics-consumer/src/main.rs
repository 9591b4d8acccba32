//! Analytics consumer process.

use analytics_consumer::{Config, OrderConsumer, router};
use microshop_redpanda::RedpandaEventBus;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,analytics_consumer=debug,rdkafka=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting analytics consumer");

    let config = Config::from_env();
    info!(
        address = %config.server.address(),
        redpanda_brokers = %config.redpanda.brokers,
        topic = %config.redpanda.orders_exchange,
        queue = %config.queue(),
        "Configuration loaded"
    );

    let metrics = analytics_consumer::metrics::install()?;

    let bus = RedpandaEventBus::from_config(&config.redpanda)?;
    let topic = config.redpanda.orders_exchange.clone();
    let consumer_task = tokio::spawn(async move {
        if let Err(e) = OrderConsumer::new().consume(&bus, &topic).await {
            error!(error = %e, "Order consumer stopped");
        }
    });

    let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
    info!(address = %config.server.address(), "Server listening");

    axum::serve(listener, router(metrics))
        .with_graceful_shutdown(microshop_web::shutdown_signal())
        .await?;

    consumer_task.abort();
    info!("Consumer stopped");
    Ok(())
}
