//! Infrastructure layer: wire DTOs, mailbox fan-out and the in-memory
//! implementations of the domain ports.

pub mod dto;
pub mod message_pusher;
pub mod queue;
pub mod repository;
