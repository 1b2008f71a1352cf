//! UseCase: キューからストアへのメッセージ永続化
//!
//! ハブがキューへ送ったメッセージを受信してストアに保存する。保存に成功した
//! メッセージだけをキューから削除するため、失敗したものは可視性タイムアウト後に
//! 再配信される。

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::{
    domain::{MessageQueue, MessageStore, QueueError, QueueMessage},
    infrastructure::dto::codec::decode_chat_message,
};

/// Maximum number of messages received per poll
pub const RECEIVE_BATCH_SIZE: usize = 10;
/// Long-poll wait when the queue is empty
pub const RECEIVE_WAIT: Duration = Duration::from_secs(10);
/// Pause after a failed receive
pub const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Outcome of a single poll
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub received: usize,
    pub stored: usize,
}

/// Moves chat messages from the queue into the store.
pub struct StorageConsumer {
    queue: Arc<dyn MessageQueue>,
    store: Arc<dyn MessageStore>,
    receive_wait: Duration,
    error_backoff: Duration,
}

impl StorageConsumer {
    pub fn new(queue: Arc<dyn MessageQueue>, store: Arc<dyn MessageStore>) -> Self {
        Self {
            queue,
            store,
            receive_wait: RECEIVE_WAIT,
            error_backoff: ERROR_BACKOFF,
        }
    }

    pub fn with_timing(mut self, receive_wait: Duration, error_backoff: Duration) -> Self {
        self.receive_wait = receive_wait;
        self.error_backoff = error_backoff;
        self
    }

    /// Receive one batch and store every message in it.
    ///
    /// Per-message failures are logged and leave the message in the queue;
    /// only a failed receive is returned as an error.
    pub async fn poll_once(&self) -> Result<PollSummary, QueueError> {
        let batch = self
            .queue
            .receive(RECEIVE_BATCH_SIZE, self.receive_wait)
            .await?;

        let mut summary = PollSummary {
            received: batch.len(),
            stored: 0,
        };
        for message in batch {
            if self.store_one(message).await {
                summary.stored += 1;
            }
        }
        if summary.received > 0 {
            tracing::debug!(
                "Stored {}/{} queued message(s)",
                summary.stored,
                summary.received
            );
        }
        Ok(summary)
    }

    async fn store_one(&self, message: QueueMessage) -> bool {
        let chat_message = match decode_chat_message(&message.body) {
            Ok(chat_message) => chat_message,
            Err(e) => {
                tracing::warn!("Skipping undecodable queue message: {}", e);
                return false;
            }
        };
        let id = chat_message.id().clone();

        if let Err(e) = self.store.save(chat_message).await {
            tracing::warn!("Failed to store message '{}': {}", id, e);
            return false;
        }
        if let Err(e) = self.queue.delete(&message.receipt_handle).await {
            tracing::warn!("Failed to delete message '{}' from queue: {}", id, e);
        }
        true
    }

    /// Poll until `shutdown` turns `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Storage consumer started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                result = self.poll_once() => {
                    if let Err(e) = result {
                        tracing::error!("Failed to receive from queue: {}", e);
                        tokio::select! {
                            _ = shutdown.changed() => {}
                            _ = tokio::time::sleep(self.error_backoff) => {}
                        }
                    }
                }
            }
        }
        tracing::info!("Storage consumer stopped");
    }
}
