//! Terminal chat client for the Natter gateway.

pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
