//! Utilities shared by the Natter server and client binaries.

pub mod logger;
pub mod time;
