//! Queue-backed chat message publisher.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{ChatMessage, ChatMessagePublisher, MessageQueue, PublishError},
    infrastructure::dto::codec::encode_chat_message,
};

/// Serializes each chat message to JSON and sends it to a [`MessageQueue`].
pub struct QueueChatMessagePublisher {
    queue: Arc<dyn MessageQueue>,
}

impl QueueChatMessagePublisher {
    pub fn new(queue: Arc<dyn MessageQueue>) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl ChatMessagePublisher for QueueChatMessagePublisher {
    async fn publish(&self, message: ChatMessage) -> Result<(), PublishError> {
        let body =
            encode_chat_message(&message).map_err(|e| PublishError::Encode(e.to_string()))?;
        self.queue.send(body).await?;
        tracing::debug!("Chat message '{}' sent to queue", message.id());
        Ok(())
    }
}
