//! Ports the gateway needs from its collaborators.
//!
//! The hub only knows [`ChatMessagePublisher`]. [`MessageQueue`] and
//! [`MessageStore`] describe the persistence pipeline behind it; concrete
//! implementations live in the infrastructure layer.

use std::time::Duration;

use async_trait::async_trait;

use super::{
    entity::ChatMessage,
    error::{PublishError, QueueError, StoreError},
};

/// Hands accepted chat messages off for durable storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatMessagePublisher: Send + Sync {
    /// Publish one message. No delivery confirmation beyond the result.
    async fn publish(&self, message: ChatMessage) -> Result<(), PublishError>;
}

/// A message received from a [`MessageQueue`], invisible to other receivers
/// until it is deleted or its visibility timeout expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub receipt_handle: String,
    pub body: String,
}

/// Send/receive/delete message queue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageQueue: Send + Sync {
    async fn send(&self, body: String) -> Result<(), QueueError>;

    /// Receive up to `max_messages`, waiting at most `wait` when the queue is empty.
    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, QueueError>;

    /// Acknowledge a received message so it is never redelivered.
    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError>;
}

/// Put/scan store for persisted chat messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Store a message keyed by its id; saving the same id again overwrites.
    async fn save(&self, message: ChatMessage) -> Result<(), StoreError>;

    /// Up to `limit` most recent messages, oldest first.
    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;
}
