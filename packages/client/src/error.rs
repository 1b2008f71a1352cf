//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the requested display name
    #[error("Name '{name}' was rejected: {reason}")]
    NameRejected { name: String, reason: String },

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to load message history
    #[error("History error: {0}")]
    HistoryError(String),
}
