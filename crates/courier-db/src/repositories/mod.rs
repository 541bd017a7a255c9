//! PostgreSQL repository implementations

pub mod conversation;
pub mod error;
pub mod membership;
pub mod message;

pub use conversation::PgConversationRepository;
pub use membership::PgMembershipRepository;
pub use message::PgMessageRepository;
