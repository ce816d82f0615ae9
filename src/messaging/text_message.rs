use std::sync::Arc;

use super::MessageSender;
use crate::metrics::Metrics;

/// Queue that product reads announce themselves on
pub const TEXT_MESSAGE_QUEUE: &str = "text.messagequeue";

/// Fire-and-forget text notifications to a single queue
pub struct TextMessageService {
    sender: Arc<dyn MessageSender>,
    queue: String,
    metrics: Arc<Metrics>,
}

impl TextMessageService {
    pub fn new(sender: Arc<dyn MessageSender>, queue: impl Into<String>, metrics: Arc<Metrics>) -> Self {
        Self {
            sender,
            queue: queue.into(),
            metrics,
        }
    }

    /// Failures are logged and swallowed; callers never wait on delivery.
    pub async fn send_text_message(&self, text: &str) {
        match self.sender.send(&self.queue, text).await {
            Ok(()) => {
                self.metrics.record_message_sent(&self.queue);
                tracing::debug!(queue = %self.queue, message = %text, "Sent text message");
            }
            Err(e) => {
                tracing::warn!(
                    queue = %self.queue,
                    error = %e,
                    "Text message not sent"
                );
            }
        }
    }
}
