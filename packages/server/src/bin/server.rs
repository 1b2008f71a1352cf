//! Natter chat gateway.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin natter-server
//! cargo run --bin natter-server -- --host 0.0.0.0 --port 3000
//! ```

use std::time::Duration;

use clap::Parser;
use natter_server::{
    config::{
        DEFAULT_HISTORY_LIMIT, DEFAULT_HOST, DEFAULT_HUB_BUFFER, DEFAULT_MAILBOX_CAPACITY,
        DEFAULT_PORT, DEFAULT_VISIBILITY_TIMEOUT_SECS, ServerConfig,
    },
    runner::run_server,
};
use natter_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "natter-server")]
#[command(about = "Real-time chat gateway with presence and typing indicators", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "NATTER_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "NATTER_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Outbound events buffered per connection before it is dropped as too slow
    #[arg(long, env = "NATTER_MAILBOX_CAPACITY", default_value_t = DEFAULT_MAILBOX_CAPACITY)]
    mailbox_capacity: usize,

    /// Commands buffered in front of the hub
    #[arg(long, env = "NATTER_HUB_BUFFER", default_value_t = DEFAULT_HUB_BUFFER)]
    hub_buffer: usize,

    /// Number of messages served by GET /history
    #[arg(long, env = "NATTER_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Seconds a received queue message stays hidden before redelivery
    #[arg(
        long,
        env = "NATTER_VISIBILITY_TIMEOUT_SECS",
        default_value_t = DEFAULT_VISIBILITY_TIMEOUT_SECS
    )]
    visibility_timeout_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            mailbox_capacity: args.mailbox_capacity,
            hub_buffer: args.hub_buffer,
            history_limit: args.history_limit,
            visibility_timeout: Duration::from_secs(args.visibility_timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_server(ServerConfig::from(args)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
