//! Domain entities

pub mod conversation;
pub mod membership;
pub mod message;

pub use conversation::{direct_pair_key, Conversation, ConversationKind};
pub use membership::Membership;
pub use message::{Message, MessageBody, MessageKind};
