//! Runtime configuration of the chat server.

use std::time::Duration;

use clap::Parser;

use crate::usecase::DEFAULT_TYPING_TIMEOUT;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_CONNECTIONS: usize = 100;

/// Settings consumed by `Server::run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to bind to (`0` picks an ephemeral port)
    pub port: u16,
    /// Interval between liveness pings on each WebSocket
    pub heartbeat_interval: Duration,
    /// Upper bound of simultaneously registered connections
    pub max_connections: usize,
    /// Delay before a silent typist is reported as stopped
    pub typing_timeout: Duration,
    /// Seed the store with the demo conversation on startup
    pub seed_sample_messages: bool,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            typing_timeout: DEFAULT_TYPING_TIMEOUT,
            seed_sample_messages: false,
        }
    }
}

/// Command line of the `buzz-server` binary, with environment fallbacks
#[derive(Parser, Debug)]
#[command(name = "buzz-server")]
#[command(about = "Realtime chat server with REST and WebSocket endpoints", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds between liveness pings on each WebSocket (at least 1)
    #[arg(
        long,
        env = "HEARTBEAT_INTERVAL_SECS",
        default_value_t = DEFAULT_HEARTBEAT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub heartbeat_interval_secs: u64,

    /// Maximum number of simultaneous WebSocket connections
    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,

    /// Milliseconds before a silent typist is reported as stopped
    #[arg(long, env = "TYPING_TIMEOUT_MS", default_value_t = 3000)]
    pub typing_timeout_ms: u64,

    /// Start with the demo conversation already stored
    #[arg(long, env = "SEED_SAMPLE_MESSAGES")]
    pub seed_sample_messages: bool,
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            heartbeat_interval: Duration::from_secs(args.heartbeat_interval_secs),
            max_connections: args.max_connections,
            typing_timeout: Duration::from_millis(args.typing_timeout_ms),
            seed_sample_messages: args.seed_sample_messages,
        }
    }
}
