//! Utilities shared between the Buzz server and client.

pub mod logger;
pub mod time;
