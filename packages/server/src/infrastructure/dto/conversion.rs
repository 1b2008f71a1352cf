//! Conversion logic between DTOs and domain types.

use natter_shared::time::{parse_rfc3339, to_rfc3339};

use crate::domain::{
    ChatMessage, DisplayName, IncomingEvent, MessageId, OutgoingEvent, ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

use super::codec::ProtocolError;

// ========================================
// DTO → Domain
// ========================================

impl From<dto::IncomingMessage> for IncomingEvent {
    fn from(dto: dto::IncomingMessage) -> Self {
        match dto {
            dto::IncomingMessage::SetName { name } => Self::SetName { name },
            dto::IncomingMessage::Message { text } => Self::Message { text },
            dto::IncomingMessage::TypingStart => Self::TypingStart,
            dto::IncomingMessage::TypingStop => Self::TypingStop,
        }
    }
}

impl TryFrom<dto::ChatMessageDto> for ChatMessage {
    type Error = ProtocolError;

    fn try_from(dto: dto::ChatMessageDto) -> Result<Self, Self::Error> {
        let id = MessageId::new(dto.id).map_err(invalid_field)?;
        let author = DisplayName::parse(&dto.user).map_err(invalid_field)?;
        let sent_at = parse_rfc3339(&dto.timestamp)
            .ok_or_else(|| ProtocolError::InvalidField(format!("timestamp '{}'", dto.timestamp)))?;
        Ok(ChatMessage::new(id, author, dto.text, sent_at))
    }
}

fn invalid_field(error: ValueObjectError) -> ProtocolError {
    ProtocolError::InvalidField(error.to_string())
}

// ========================================
// Domain → DTO
// ========================================

impl From<&ChatMessage> for dto::ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id().as_str().to_string(),
            user: message.author().as_str().to_string(),
            text: message.text().to_string(),
            timestamp: to_rfc3339(message.sent_at()),
        }
    }
}

impl From<OutgoingEvent> for dto::OutgoingMessage {
    fn from(event: OutgoingEvent) -> Self {
        match event {
            OutgoingEvent::NameAccepted => Self::NameAccepted,
            OutgoingEvent::NameRejected { reason } => Self::NameRejected { reason },
            OutgoingEvent::UserList { users } => Self::UserList { users },
            OutgoingEvent::Typing { users } => Self::Typing { typing: users },
            OutgoingEvent::Message { message } => Self::Message {
                message: (&message).into(),
            },
        }
    }
}
