// ============================================================================
// Messaging Module
// ============================================================================
//
// Seams between the application and whatever broker is configured:
// - MessageSender:    best-effort, at-most-once text send to a destination
// - ConnectionProbe:  cheap "are we connected" query used by health checks
// - MessageHandler:   callback invoked per inbound message
//
// Implementations:
// - kafka   - rdkafka producer / stream consumer
// - memory  - in-process broadcast channels (no broker configured, tests)
//
// ============================================================================

mod kafka;
mod listener;
mod memory;
mod text_message;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::MessagingError;

pub use kafka::{run_kafka_listener, KafkaClient};
pub use listener::{run_memory_listener, LoggingListener};
pub use memory::InMemoryBroker;
pub use text_message::{TextMessageService, TEXT_MESSAGE_QUEUE};

/// Snapshot returned by a successful connection probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionMetrics {
    pub brokers: usize,
    pub topics: usize,
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Hand `body` to the broker for `destination`. Delivery is not awaited.
    async fn send(&self, destination: &str, body: &str) -> Result<(), MessagingError>;
}

#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    async fn connection_metrics(&self, timeout: Duration) -> Result<ConnectionMetrics, MessagingError>;
}

#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_message(&self, topic: &str, payload: &str);
}
