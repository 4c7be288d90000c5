//! Realtime chat server library.
//!
//! Provides the in-memory message store, the WebSocket broadcast fan-out and
//! the typing-presence expiry that together make up the Buzz chat server.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
