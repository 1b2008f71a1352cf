//! Data Transfer Objects (DTOs) for the chat gateway.
//!
//! - `websocket`: protocol frames and the chat message payload
//! - `conversion`: mapping between DTOs and domain types
//! - `codec`: JSON encode/decode entry points

pub mod codec;
pub mod conversion;
pub mod websocket;
