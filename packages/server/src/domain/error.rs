//! Domain error types.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("message id must not be empty")]
    EmptyMessageId,

    #[error("invalid connection id: {0}")]
    InvalidConnectionId(String),
}

/// Reasons a name claim fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("name is empty")]
    Empty,

    #[error("name '{0}' is already claimed")]
    Taken(String),

    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}

/// Mailbox delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection {0} has no mailbox")]
    ClientNotFound(ConnectionId),

    #[error("mailbox of connection {0} is full")]
    MailboxFull(ConnectionId),

    #[error("mailbox of connection {0} is closed")]
    MailboxClosed(ConnectionId),
}

/// Errors raised while handing a chat message to the persistence queue
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to encode chat message: {0}")]
    Encode(String),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Message queue errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("queue is closed")]
    Closed,

    #[error("unknown receipt handle: {0}")]
    ReceiptNotFound(String),

    #[error("queue transport error: {0}")]
    Transport(String),
}

/// Message store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message store is unavailable: {0}")]
    Unavailable(String),
}
