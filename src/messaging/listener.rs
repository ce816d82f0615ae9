use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use super::MessageHandler;
use crate::metrics::Metrics;

/// Receive callback that only logs the payload
pub struct LoggingListener {
    metrics: Arc<Metrics>,
}

impl LoggingListener {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl MessageHandler for LoggingListener {
    async fn on_message(&self, topic: &str, payload: &str) {
        tracing::info!(topic = %topic, "Received from topic={} message={}", topic, payload);
        self.metrics.record_message_received(topic);
    }
}

/// Drain an in-memory subscription until `shutdown` fires or the broker is gone
pub async fn run_memory_listener(
    topic: String,
    mut receiver: broadcast::Receiver<String>,
    handler: Arc<dyn MessageHandler>,
    shutdown: CancellationToken,
) {
    tracing::info!(topic = %topic, "In-memory listener started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = receiver.recv() => match received {
                Ok(payload) => handler.on_message(&topic, &payload).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = %topic, skipped, "Listener lagged, messages skipped");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    tracing::info!(topic = %topic, "In-memory listener stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{InMemoryBroker, MessageSender};
    use std::time::Duration;

    #[tokio::test]
    async fn test_logging_listener_counts_messages() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let listener = LoggingListener::new(metrics.clone());

        listener.on_message("test", "one").await;
        listener.on_message("test", "two").await;

        assert_eq!(metrics.messages_received.with_label_values(&["test"]).get(), 2);
    }

    #[tokio::test]
    async fn test_memory_listener_handles_until_cancelled() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let broker = InMemoryBroker::new();
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(run_memory_listener(
            "test".to_string(),
            broker.subscribe("test"),
            Arc::new(LoggingListener::new(metrics.clone())),
            shutdown.clone(),
        ));

        broker.send("test", "hello").await.unwrap();

        let counter = metrics.messages_received.with_label_values(&["test"]);
        for _ in 0..50 {
            if counter.get() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(counter.get(), 1);

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("listener should stop after cancel")
            .unwrap();
    }
}
