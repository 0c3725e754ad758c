use crate::config::EventTopics;
use crate::message_queue::{Message, MessageQueue};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// What to do with a serialized integration event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishPolicy {
    /// Hand the payload to the message channel.
    Publish,
    /// Log the payload instead of sending it (transport disabled).
    LogOnly,
}

/// Best-effort publisher for the sale-created integration event.
///
/// Failures are logged and swallowed: the sale pipeline never fails or rolls
/// back because a notification could not be delivered. Retry and backoff are
/// the transport's concern, not this publisher's.
#[derive(Clone)]
pub struct SaleCreatedPublisher {
    queue: Arc<dyn MessageQueue>,
    topics: EventTopics,
    policy: PublishPolicy,
}

impl SaleCreatedPublisher {
    pub fn new(queue: Arc<dyn MessageQueue>, topics: EventTopics, policy: PublishPolicy) -> Self {
        Self {
            queue,
            topics,
            policy,
        }
    }

    /// Serializes the persisted sale's public fields and publishes them,
    /// keyed by sale id. Never returns an error.
    pub async fn notify_created<T: Serialize>(&self, sale_id: Uuid, sale: &T) {
        let payload = match serde_json::to_value(sale) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, %sale_id, "Failed to serialize sale created event");
                return;
            }
        };

        match self.policy {
            PublishPolicy::LogOnly => {
                info!(
                    topic = %self.topics.sale_created,
                    %sale_id,
                    "Sale created event logged (publishing disabled)"
                );
            }
            PublishPolicy::Publish => {
                let message = Message::with_key(
                    self.topics.sale_created.clone(),
                    sale_id.to_string(),
                    payload,
                );
                match self.queue.publish(message).await {
                    Ok(()) => {
                        info!(
                            topic = %self.topics.sale_created,
                            %sale_id,
                            "Sale created event published"
                        );
                    }
                    Err(e) => {
                        warn!(
                            error = %e,
                            topic = %self.topics.sale_created,
                            group = %self.topics.sale_created_group,
                            %sale_id,
                            "Failed to publish sale created event"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_queue::{InMemoryMessageQueue, MessageQueueError};
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingQueue;

    #[async_trait]
    impl MessageQueue for FailingQueue {
        async fn publish(&self, _message: Message) -> Result<(), MessageQueueError> {
            Err(MessageQueueError::ConnectionError("broker down".into()))
        }

        async fn subscribe(&self, _topic: &str) -> Result<Option<Message>, MessageQueueError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn publishes_keyed_message_to_configured_topic() {
        let queue = Arc::new(InMemoryMessageQueue::new());
        let topics = EventTopics::default();
        let publisher =
            SaleCreatedPublisher::new(queue.clone(), topics.clone(), PublishPolicy::Publish);

        let sale_id = Uuid::new_v4();
        publisher
            .notify_created(sale_id, &json!({"id": sale_id.to_string()}))
            .await;

        let message = queue
            .subscribe(&topics.sale_created)
            .await
            .unwrap()
            .expect("event should be published");
        assert_eq!(message.key.as_deref(), Some(sale_id.to_string().as_str()));
        assert_eq!(message.payload["id"], json!(sale_id.to_string()));
    }

    #[tokio::test]
    async fn transport_failure_is_swallowed() {
        let publisher = SaleCreatedPublisher::new(
            Arc::new(FailingQueue),
            EventTopics::default(),
            PublishPolicy::Publish,
        );

        // must not panic or propagate
        publisher.notify_created(Uuid::new_v4(), &json!({})).await;
    }

    #[tokio::test]
    async fn log_only_policy_skips_the_queue() {
        let queue = Arc::new(InMemoryMessageQueue::new());
        let topics = EventTopics::default();
        let publisher =
            SaleCreatedPublisher::new(queue.clone(), topics.clone(), PublishPolicy::LogOnly);

        publisher.notify_created(Uuid::new_v4(), &json!({})).await;

        assert!(queue.subscribe(&topics.sale_created).await.unwrap().is_none());
    }
}
