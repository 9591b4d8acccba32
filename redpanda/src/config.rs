//! Broker settings read from the environment.

use std::env;

/// Broker connection and topology settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedpandaConfig {
    /// Broker addresses (comma-separated)
    pub brokers: String,
    /// Producer acknowledgment mode ("0", "1", "all")
    pub producer_acks: String,
    /// Producer send timeout in milliseconds
    pub timeout_ms: u64,
    /// Topic order events are published to and consumed from
    pub orders_exchange: String,
    /// Consumer group of the analytics consumer
    pub consumer_group: Option<String>,
    /// Where a new consumer group starts reading
    pub auto_offset_reset: String,
    /// Events buffered between the Kafka consumer and the subscriber
    pub buffer_size: usize,
}

impl RedpandaConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `REDPANDA_BROKERS` | `localhost:9092` |
    /// | `REDPANDA_PRODUCER_ACKS` | `1` |
    /// | `REDPANDA_TIMEOUT_MS` | `5000` |
    /// | `ORDERS_EXCHANGE` | `orders.ex` |
    /// | `ORDERS_QUEUE` | unset |
    /// | `REDPANDA_AUTO_OFFSET_RESET` | `earliest` |
    /// | `CONSUMER_BUFFER_SIZE` | `10` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            brokers: lookup("REDPANDA_BROKERS").unwrap_or_else(|| "localhost:9092".to_string()),
            producer_acks: lookup("REDPANDA_PRODUCER_ACKS").unwrap_or_else(|| "1".to_string()),
            timeout_ms: lookup("REDPANDA_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            orders_exchange: lookup("ORDERS_EXCHANGE").unwrap_or_else(|| "orders.ex".to_string()),
            consumer_group: lookup("ORDERS_QUEUE"),
            auto_offset_reset: lookup("REDPANDA_AUTO_OFFSET_RESET")
                .unwrap_or_else(|| "earliest".to_string()),
            buffer_size: lookup("CONSUMER_BUFFER_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = RedpandaConfig::from_lookup(|_| None);

        assert_eq!(config.brokers, "localhost:9092");
        assert_eq!(config.producer_acks, "1");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.orders_exchange, "orders.ex");
        assert_eq!(config.consumer_group, None);
        assert_eq!(config.auto_offset_reset, "earliest");
        assert_eq!(config.buffer_size, 10);
    }

    #[test]
    fn reads_overrides_and_ignores_unparsable_numbers() {
        let vars = HashMap::from([
            ("REDPANDA_BROKERS", "redpanda:29092"),
            ("ORDERS_QUEUE", "orders.q"),
            ("REDPANDA_TIMEOUT_MS", "soon"),
            ("CONSUMER_BUFFER_SIZE", "64"),
        ]);

        let config = RedpandaConfig::from_lookup(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(config.brokers, "redpanda:29092");
        assert_eq!(config.consumer_group.as_deref(), Some("orders.q"));
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.buffer_size, 64);
    }
}
