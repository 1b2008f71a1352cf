//! Request handlers.

mod http;
mod websocket;

pub use http::{health_check, history};
pub use websocket::websocket_handler;
