//! Terminal client for the Buzz realtime chat.
//!
//! Renders the message stream and typing notices, posts typed lines through
//! the REST API and reports the local user's typing activity over the
//! WebSocket.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod history;
mod input;
mod runner;
mod session;
pub mod typing;
mod ui;

pub use runner::{ClientConfig, run_client};
