//! UseCase: 最近のメッセージ取得 (`GET /history`)

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageStore, StoreError};

pub struct GetRecentMessagesUseCase {
    store: Arc<dyn MessageStore>,
    limit: usize,
}

impl GetRecentMessagesUseCase {
    pub fn new(store: Arc<dyn MessageStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Up to the configured number of most recent messages, oldest first.
    pub async fn execute(&self) -> Result<Vec<ChatMessage>, StoreError> {
        self.store.recent_messages(self.limit).await
    }
}
