//! Message queue implementations.
//!
//! - `in_memory`: send/receive/delete queue with a visibility timeout
//! - `publisher`: the hub's [`ChatMessagePublisher`](crate::domain::ChatMessagePublisher)
//!   backed by any [`MessageQueue`](crate::domain::MessageQueue)

pub mod in_memory;
pub mod publisher;

pub use in_memory::InMemoryQueue;
pub use publisher::QueueChatMessagePublisher;
