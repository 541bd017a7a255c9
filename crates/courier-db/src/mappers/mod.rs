//! Entity <-> model mappers

pub mod conversation;
pub mod membership;
pub mod message;

pub use message::MessageInsert;
