//! Ports implemented by infrastructure adapters

pub mod notifier;
pub mod repositories;

pub use notifier::Notifier;
pub use repositories::{
    ConversationRepository, MembershipRepository, MessageRepository, RepoResult,
};
