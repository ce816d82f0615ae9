use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{Health, HealthIndicator};
use crate::messaging::ConnectionProbe;
use crate::repository::StoreProbe;

// ============================================================================
// Health Indicators
// ============================================================================

/// DOWN iff querying the broker's connection metrics fails
pub struct KafkaHealthIndicator {
    probe: Arc<dyn ConnectionProbe>,
    timeout: Duration,
}

impl KafkaHealthIndicator {
    pub fn new(probe: Arc<dyn ConnectionProbe>, timeout: Duration) -> Self {
        tracing::info!(timeout_ms = timeout.as_millis() as u64, "[KafkaHealthIndicator] timeout configured");
        Self { probe, timeout }
    }
}

#[async_trait]
impl HealthIndicator for KafkaHealthIndicator {
    async fn health(&self) -> Health {
        match self.probe.connection_metrics(self.timeout).await {
            Ok(metrics) => Health::up()
                .with_detail("brokers", metrics.brokers)
                .with_detail("topics", metrics.topics),
            Err(e) => {
                tracing::error!(error = %e, "[kafka-health-indicator]: Kafka health DOWN");
                Health::down_with_error(&e)
            }
        }
    }
}

/// Coin flip. Demonstrates registration only; carries no real signal.
pub struct RandomHealthIndicator;

#[async_trait]
impl HealthIndicator for RandomHealthIndicator {
    async fn health(&self) -> Health {
        if rand::random::<bool>() {
            Health::down().with_detail("MSG-001", "Random Failure")
        } else {
            Health::up()
        }
    }
}

pub struct PingHealthIndicator;

#[async_trait]
impl HealthIndicator for PingHealthIndicator {
    async fn health(&self) -> Health {
        Health::up()
    }
}

/// Runs a trivial query against the persistence backend
pub struct DatabaseHealthIndicator {
    probe: Arc<dyn StoreProbe>,
}

impl DatabaseHealthIndicator {
    pub fn new(probe: Arc<dyn StoreProbe>) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl HealthIndicator for DatabaseHealthIndicator {
    async fn health(&self) -> Health {
        match self.probe.ping().await {
            Ok(()) => Health::up().with_detail("database", self.probe.backend()),
            Err(e) => {
                tracing::error!(error = %e, backend = %self.probe.backend(), "Database health DOWN");
                Health::down_with_error(&e).with_detail("database", self.probe.backend())
            }
        }
    }
}
