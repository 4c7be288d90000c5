//! Terminal chat client with typing indicators and reconnection support.
//!
//! Shows the recent history and live messages, posts typed lines through the
//! REST API and reports typing activity over the WebSocket. Automatically
//! reconnects on disconnection (max 5 attempts, waiting 2 s × attempt).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin buzz-client -- --user Alice
//! cargo run --bin buzz-client -- -u Bob --url ws://127.0.0.1:5000/ws --api-url http://127.0.0.1:5000/api
//! ```

use buzz_client::{ClientConfig, run_client};
use buzz_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "buzz-client")]
#[command(about = "Terminal client for the Buzz realtime chat", long_about = None)]
struct Args {
    /// Display name attached to your messages
    #[arg(short = 'u', long)]
    user: String,

    /// WebSocket server URL
    #[arg(long, default_value = "ws://127.0.0.1:5000/ws")]
    url: String,

    /// REST API base URL
    #[arg(long, default_value = "http://127.0.0.1:5000/api")]
    api_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ClientConfig {
        user: args.user,
        ws_url: args.url,
        api_url: args.api_url,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
