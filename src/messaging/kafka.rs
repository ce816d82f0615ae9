use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    consumer::{Consumer, StreamConsumer},
    message::BorrowedMessage,
    producer::{FutureProducer, FutureRecord, Producer},
    Message,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{ConnectionMetrics, ConnectionProbe, MessageHandler, MessageSender};
use crate::error::MessagingError;

// ============================================================================
// Kafka Client - producer side
// ============================================================================

pub struct KafkaClient {
    producer: FutureProducer,
}

impl KafkaClient {
    pub fn new(brokers: &str) -> Result<Self, MessagingError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        tracing::info!(brokers = %brokers, "Kafka producer created");

        Ok(Self { producer })
    }
}

#[async_trait]
impl MessageSender for KafkaClient {
    async fn send(&self, destination: &str, body: &str) -> Result<(), MessagingError> {
        let record: FutureRecord<'_, (), str> = FutureRecord::to(destination).payload(body);

        // Enqueue only; the delivery future is dropped so nothing waits on the ack.
        match self.producer.send_result(record) {
            Ok(_delivery) => {
                tracing::debug!(destination = %destination, "Enqueued message for Kafka");
                Ok(())
            }
            Err((e, _)) => {
                tracing::error!(
                    error = %e,
                    destination = %destination,
                    "Failed to enqueue message for Kafka"
                );
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl ConnectionProbe for KafkaClient {
    async fn connection_metrics(&self, timeout: Duration) -> Result<ConnectionMetrics, MessagingError> {
        let producer = self.producer.clone();

        // fetch_metadata blocks the calling thread
        let fetch = tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(None, timeout)
                .map(|metadata| ConnectionMetrics {
                    brokers: metadata.brokers().len(),
                    topics: metadata.topics().len(),
                })
        });

        let metrics = tokio::time::timeout(timeout, fetch)
            .await
            .map_err(|_| MessagingError::Timeout(timeout))?
            .map_err(|e| MessagingError::Join(e.to_string()))??;

        Ok(metrics)
    }
}

// ============================================================================
// Kafka Listener - consumer side
// ============================================================================

/// Consume `topics` as part of `group` until `shutdown` fires, passing each
/// message to `handler`.
pub async fn run_kafka_listener(
    brokers: &str,
    group: &str,
    topics: &[&str],
    handler: Arc<dyn MessageHandler>,
    shutdown: CancellationToken,
) -> Result<(), MessagingError> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .set("group.id", group)
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "latest")
        .create()?;

    consumer.subscribe(topics)?;

    tracing::info!(group = %group, topics = ?topics, "Kafka listener subscribed");

    loop {
        let inbound = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = consumer.recv() => match received {
                Ok(message) => decode(&message),
                Err(e) => {
                    tracing::error!(error = %e, "Kafka consume error");
                    None
                }
            },
        };

        if let Some((topic, payload)) = inbound {
            handler.on_message(&topic, &payload).await;
        }
    }

    tracing::info!(group = %group, "Kafka listener stopped");
    Ok(())
}

fn decode(message: &BorrowedMessage<'_>) -> Option<(String, String)> {
    let payload = match message.payload_view::<str>() {
        Some(Ok(text)) => text.to_string(),
        Some(Err(e)) => {
            tracing::warn!(
                topic = %message.topic(),
                offset = message.offset(),
                error = %e,
                "Skipping non-UTF-8 payload"
            );
            return None;
        }
        None => String::new(),
    };

    Some((message.topic().to_string(), payload))
}
