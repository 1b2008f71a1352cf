//! In-memory implementations of the storage ports.

pub mod message_store;

pub use message_store::InMemoryMessageStore;
