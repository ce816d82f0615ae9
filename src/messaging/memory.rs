use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::broadcast;

use super::{ConnectionMetrics, ConnectionProbe, MessageSender};
use crate::error::MessagingError;

const DEFAULT_CAPACITY: usize = 256;

/// In-process broker: one broadcast channel per destination, created lazily.
/// A send with no live subscriber is dropped.
pub struct InMemoryBroker {
    channels: Mutex<HashMap<String, broadcast::Sender<String>>>,
    capacity: usize,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn subscribe(&self, destination: &str) -> broadcast::Receiver<String> {
        self.channel(destination).subscribe()
    }

    fn channel(&self, destination: &str) -> broadcast::Sender<String> {
        self.channels
            .lock()
            .entry(destination.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSender for InMemoryBroker {
    async fn send(&self, destination: &str, body: &str) -> Result<(), MessagingError> {
        match self.channel(destination).send(body.to_string()) {
            Ok(receivers) => {
                tracing::debug!(destination = %destination, receivers, "Delivered in-memory message");
            }
            Err(_) => {
                tracing::debug!(destination = %destination, "No subscribers, message dropped");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectionProbe for InMemoryBroker {
    async fn connection_metrics(&self, _timeout: Duration) -> Result<ConnectionMetrics, MessagingError> {
        Ok(ConnectionMetrics {
            brokers: 1,
            topics: self.channels.lock().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_sent_message() {
        let broker = InMemoryBroker::new();
        let mut rx = broker.subscribe("text.messagequeue");

        broker.send("text.messagequeue", "hello").await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_send_without_subscriber_is_dropped() {
        let broker = InMemoryBroker::new();
        broker.send("nobody", "lost").await.unwrap();

        // A late subscriber does not see earlier messages
        let mut rx = broker.subscribe("nobody");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_destinations_are_isolated() {
        let broker = InMemoryBroker::new();
        let mut a = broker.subscribe("a");
        let mut b = broker.subscribe("b");

        broker.send("a", "for-a").await.unwrap();

        assert_eq!(a.recv().await.unwrap(), "for-a");
        assert!(b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connection_metrics_counts_destinations() {
        let broker = InMemoryBroker::new();
        let _a = broker.subscribe("a");
        let _b = broker.subscribe("b");

        let metrics = broker.connection_metrics(Duration::from_millis(100)).await.unwrap();
        assert_eq!(metrics, ConnectionMetrics { brokers: 1, topics: 2 });
    }
}
