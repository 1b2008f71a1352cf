//! Terminal chat client for the Natter gateway.
//!
//! Prints recent history, claims a display name and relays chat events.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval); a rejected name exits immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin natter-client -- --name alice
//! cargo run --bin natter-client -- -n bob --url ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;
use natter_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "natter-client")]
#[command(about = "Terminal chat client with presence and typing indicators", long_about = None)]
struct Args {
    /// Display name to claim (must be unique among connected users)
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket endpoint of the gateway
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// History endpoint of the gateway
    #[arg(long, default_value = "http://127.0.0.1:8080/history")]
    history_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = natter_client::run_client(args.url, args.history_url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
