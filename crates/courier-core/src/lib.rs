//! # courier-core
//!
//! Domain layer containing entities, value objects, repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    direct_pair_key, Conversation, ConversationKind, Membership, Message, MessageBody, MessageKind,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    ConversationRepository, MembershipRepository, MessageRepository, Notifier, RepoResult,
};
pub use value_objects::{Page, PageRequest, Snowflake, SnowflakeGenerator, SnowflakeParseError};
