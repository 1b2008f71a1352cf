//! Domain entities.

use chrono::{DateTime, Utc};

use super::value_object::{DisplayName, MessageId};

/// An accepted chat message. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: MessageId,
    author: DisplayName,
    text: String,
    sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(id: MessageId, author: DisplayName, text: String, sent_at: DateTime<Utc>) -> Self {
        Self {
            id,
            author,
            text,
            sent_at,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn author(&self) -> &DisplayName {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}
