use clap::Parser;
use std::time::Duration;

use crate::messaging::TEXT_MESSAGE_QUEUE;
use crate::web::DEFAULT_TRACE_CAPACITY;

// =============================================================================
// CLI Arguments / Environment
// =============================================================================

/// Product catalogue with health, metrics and messaging management surface
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// HTTP bind address
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: String,

    /// Kafka bootstrap servers; when unset an in-process broker is used
    #[arg(long, env = "KAFKA_BROKERS")]
    pub kafka_brokers: Option<String>,

    /// Timeout for the Kafka health indicator's metadata query
    #[arg(long, env = "KAFKA_HEALTH_INDICATOR_TIMEOUT_MS", default_value_t = 100)]
    pub kafka_health_timeout_ms: u64,

    /// Queue that product reads are announced on
    #[arg(long, env = "TEXT_QUEUE", default_value = TEXT_MESSAGE_QUEUE)]
    pub text_queue: String,

    /// Topic consumed by the logging listener
    #[arg(long, env = "LISTENER_TOPIC", default_value = "test")]
    pub listener_topic: String,

    /// Consumer group of the logging listener
    #[arg(long, env = "LISTENER_GROUP", default_value = "test-consumer")]
    pub listener_group: String,

    /// PostgreSQL connection string; when unset records are kept in memory
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Number of HTTP exchanges kept for /actuator/httptrace
    #[arg(long, env = "HTTP_TRACE_CAPACITY", default_value_t = DEFAULT_TRACE_CAPACITY)]
    pub http_trace_capacity: usize,

    /// Load the sample catalogue at startup
    #[arg(long, env = "SEED_SAMPLE_DATA")]
    pub seed: bool,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl AppConfig {
    pub fn kafka_health_timeout(&self) -> Duration {
        Duration::from_millis(self.kafka_health_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::try_parse_from(["product_actuator"]).unwrap();

        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert_eq!(config.kafka_health_timeout(), Duration::from_millis(100));
        assert_eq!(config.text_queue, "text.messagequeue");
        assert_eq!(config.listener_topic, "test");
        assert_eq!(config.listener_group, "test-consumer");
        assert_eq!(config.http_trace_capacity, 100);
        assert!(!config.seed);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::try_parse_from([
            "product_actuator",
            "--kafka-brokers",
            "localhost:9092",
            "--kafka-health-timeout-ms",
            "250",
            "--seed",
        ])
        .unwrap();

        assert_eq!(config.kafka_brokers.as_deref(), Some("localhost:9092"));
        assert_eq!(config.kafka_health_timeout(), Duration::from_millis(250));
        assert!(config.seed);
    }
}
