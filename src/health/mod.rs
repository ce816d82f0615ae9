use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

mod indicators;

pub use indicators::{
    DatabaseHealthIndicator, KafkaHealthIndicator, PingHealthIndicator, RandomHealthIndicator,
};

// ============================================================================
// Health Check Abstractions
// ============================================================================
//
// Each indicator reports UP/DOWN plus optional details. The registry is an
// explicit name -> indicator mapping built at startup; the aggregate is UP
// only when every registered indicator is UP.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, HealthStatus::Up)
    }
}

/// Result of a single health probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl Health {
    pub fn up() -> Self {
        Self {
            status: HealthStatus::Up,
            details: BTreeMap::new(),
        }
    }

    pub fn down() -> Self {
        Self {
            status: HealthStatus::Down,
            details: BTreeMap::new(),
        }
    }

    /// DOWN with the error message under the `error` detail
    pub fn down_with_error(error: &dyn std::error::Error) -> Self {
        Self::down().with_detail("error", error.to_string())
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// A named probe. Implementations convert their own failures into DOWN.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    async fn health(&self) -> Health;
}

/// Aggregate across every registered indicator
#[derive(Debug, Clone, Serialize)]
pub struct CompositeHealth {
    pub status: HealthStatus,
    pub components: BTreeMap<String, Health>,
}

#[derive(Default)]
pub struct HealthRegistry {
    indicators: Vec<(String, Arc<dyn HealthIndicator>)>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under `name`, replacing any indicator already using it
    pub fn register(&mut self, name: impl Into<String>, indicator: Arc<dyn HealthIndicator>) -> &mut Self {
        let name = name.into();
        match self.indicators.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = indicator,
            None => self.indicators.push((name, indicator)),
        }
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.indicators.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Evaluate a single indicator by name
    pub async fn check(&self, name: &str) -> Option<Health> {
        let (_, indicator) = self.indicators.iter().find(|(existing, _)| existing == name)?;
        Some(indicator.health().await)
    }

    /// Evaluate every indicator concurrently
    pub async fn aggregate(&self) -> CompositeHealth {
        let checks = self.indicators.iter().map(|(name, indicator)| async move {
            (name.clone(), indicator.health().await)
        });

        let components: BTreeMap<String, Health> = join_all(checks).await.into_iter().collect();

        let status = if components.values().all(|health| health.status.is_up()) {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };

        match status {
            HealthStatus::Up => tracing::debug!("System health check: UP"),
            HealthStatus::Down => {
                let down: Vec<&str> = components
                    .iter()
                    .filter(|(_, health)| !health.status.is_up())
                    .map(|(name, _)| name.as_str())
                    .collect();
                tracing::warn!(components = ?down, "System health check: DOWN");
            }
        }

        CompositeHealth { status, components }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Health);

    #[async_trait]
    impl HealthIndicator for Fixed {
        async fn health(&self) -> Health {
            self.0.clone()
        }
    }

    fn fixed(health: Health) -> Arc<dyn HealthIndicator> {
        Arc::new(Fixed(health))
    }

    #[tokio::test]
    async fn test_empty_registry_is_up() {
        let registry = HealthRegistry::new();
        let composite = registry.aggregate().await;

        assert_eq!(composite.status, HealthStatus::Up);
        assert!(composite.components.is_empty());
    }

    #[tokio::test]
    async fn test_all_up_is_up() {
        let mut registry = HealthRegistry::new();
        registry.register("a", fixed(Health::up())).register("b", fixed(Health::up()));

        assert_eq!(registry.aggregate().await.status, HealthStatus::Up);
    }

    #[tokio::test]
    async fn test_single_down_makes_aggregate_down() {
        let mut registry = HealthRegistry::new();
        registry
            .register("a", fixed(Health::up()))
            .register("b", fixed(Health::down().with_detail("MSG-001", "Random Failure")));

        let composite = registry.aggregate().await;
        assert_eq!(composite.status, HealthStatus::Down);
        assert_eq!(composite.components["a"].status, HealthStatus::Up);
        assert_eq!(composite.components["b"].details["MSG-001"], "Random Failure");
    }

    #[tokio::test]
    async fn test_register_same_name_replaces() {
        let mut registry = HealthRegistry::new();
        registry.register("db", fixed(Health::down()));
        registry.register("db", fixed(Health::up()));

        assert_eq!(registry.names(), vec!["db"]);
        assert_eq!(registry.check("db").await.unwrap().status, HealthStatus::Up);
    }

    #[tokio::test]
    async fn test_check_unknown_name() {
        let registry = HealthRegistry::new();
        assert!(registry.check("missing").await.is_none());
    }

    #[test]
    fn test_health_json_shape() {
        let up = serde_json::to_value(Health::up()).unwrap();
        assert_eq!(up, serde_json::json!({ "status": "UP" }));

        let down = serde_json::to_value(Health::down().with_detail("k", "v")).unwrap();
        assert_eq!(down, serde_json::json!({ "status": "DOWN", "details": { "k": "v" } }));
    }
}
