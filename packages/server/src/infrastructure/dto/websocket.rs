//! WebSocket protocol DTOs.
//!
//! Every frame is a JSON object with a `type` discriminator.

use serde::{Deserialize, Serialize};

/// Chat message as it appears on the wire, in the queue and in `/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: String,
    pub user: String,
    pub text: String,
    /// RFC 3339
    pub timestamp: String,
}

/// Client → server frames.
///
/// Missing `name`/`text` fields decode as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomingMessage {
    SetName {
        #[serde(default)]
        name: String,
    },
    Message {
        #[serde(default)]
        text: String,
    },
    TypingStart,
    TypingStop,
}

/// Server → client frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutgoingMessage {
    NameAccepted,
    NameRejected {
        reason: String,
    },
    UserList {
        #[serde(default)]
        users: Vec<String>,
    },
    Typing {
        #[serde(default)]
        typing: Vec<String>,
    },
    Message {
        message: ChatMessageDto,
    },
}
