//! Analytics consumer configuration.

use microshop_redpanda::RedpandaConfig;
use microshop_web::ServerConfig;

/// Default port of the health and metrics endpoints.
pub const DEFAULT_PORT: u16 = 8082;

/// Consumer group used when `ORDERS_QUEUE` is unset.
pub const DEFAULT_QUEUE: &str = "orders.q";

/// Everything the analytics consumer reads from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Health and metrics listener
    pub server: ServerConfig,
    /// Event bus, with `consumer_group` always set
    pub redpanda: RedpandaConfig,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_parts(ServerConfig::from_env(DEFAULT_PORT), RedpandaConfig::from_env())
    }

    /// Combine already-loaded settings, filling in the default consumer group.
    #[must_use]
    pub fn from_parts(server: ServerConfig, mut redpanda: RedpandaConfig) -> Self {
        redpanda
            .consumer_group
            .get_or_insert_with(|| DEFAULT_QUEUE.to_string());
        Self { server, redpanda }
    }

    /// The consumer group this service joins.
    #[must_use]
    pub fn queue(&self) -> &str {
        self.redpanda.consumer_group.as_deref().unwrap_or(DEFAULT_QUEUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_8082_and_the_orders_queue() {
        let config = Config::from_parts(
            ServerConfig::from_lookup(DEFAULT_PORT, |_| None),
            RedpandaConfig::from_lookup(|_| None),
        );

        assert_eq!(config.server.port, 8082);
        assert_eq!(config.queue(), "orders.q");
        assert_eq!(config.redpanda.orders_exchange, "orders.ex");
    }

    #[test]
    fn keeps_an_explicit_queue() {
        let config = Config::from_parts(
            ServerConfig::from_lookup(DEFAULT_PORT, |_| None),
            RedpandaConfig::from_lookup(|key| (key == "ORDERS_QUEUE").then(|| "reporting".to_string())),
        );

        assert_eq!(config.queue(), "reporting");
    }
}
