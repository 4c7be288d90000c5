//! Infrastructure layer: concrete storage, connection registry and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
