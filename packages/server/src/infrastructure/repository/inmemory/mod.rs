//! InMemory Repository 実装

pub mod message;

pub use message::InMemoryMessageRepository;
