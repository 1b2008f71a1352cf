//! InMemory MessageStore 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! メッセージ ID をキーとする HashMap をインメモリの key-value ストアとして使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ChatMessage, MessageStore, StoreError};

#[derive(Default)]
pub struct InMemoryMessageStore {
    /// Key: message id
    messages: RwLock<HashMap<String, ChatMessage>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn save(&self, message: ChatMessage) -> Result<(), StoreError> {
        let id = message.id().as_str().to_string();
        self.messages.write().await.insert(id, message);
        Ok(())
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.read().await;
        let mut all: Vec<ChatMessage> = messages.values().cloned().collect();
        all.sort_by(|a, b| a.sent_at().cmp(&b.sent_at()).then_with(|| a.id().cmp(b.id())));
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }
}
