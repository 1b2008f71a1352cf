//! Natter chat gateway.
//!
//! A single connection hub owns presence, name and typing state, fans chat
//! events out to every WebSocket connection and hands accepted messages to a
//! queue that a storage consumer drains into the message store.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod runner;
pub mod ui;
pub mod usecase;
