//! Events exchanged between connections and the hub.

use super::entity::ChatMessage;

/// Rejection reason sent for both empty and duplicate names.
pub const NAME_TAKEN_REASON: &str = "Name taken";

/// A decoded client request, dispatched by the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingEvent {
    SetName { name: String },
    Message { text: String },
    TypingStart,
    TypingStop,
}

/// An event queued in a connection's mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingEvent {
    NameAccepted,
    NameRejected { reason: String },
    UserList { users: Vec<String> },
    Typing { users: Vec<String> },
    Message { message: ChatMessage },
}

impl OutgoingEvent {
    pub fn name_taken() -> Self {
        Self::NameRejected {
            reason: NAME_TAKEN_REASON.to_string(),
        }
    }

    /// Wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NameAccepted => "NAME_ACCEPTED",
            Self::NameRejected { .. } => "NAME_REJECTED",
            Self::UserList { .. } => "USER_LIST",
            Self::Typing { .. } => "TYPING",
            Self::Message { .. } => "MESSAGE",
        }
    }
}
