//! WebSocket / REST gateway of the chat server.

mod error;
mod handler;
mod server;
mod signal;
pub mod state; // テストから AppState を組み立てるため public

pub use error::ApiError;
pub use server::{Server, router};
