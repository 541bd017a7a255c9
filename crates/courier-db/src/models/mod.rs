//! Database row models

pub mod conversation;
pub mod membership;
pub mod message;

pub use conversation::ConversationModel;
pub use membership::MembershipModel;
pub use message::MessageModel;
