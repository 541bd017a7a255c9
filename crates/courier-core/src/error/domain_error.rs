//! Domain error - business rule violations

use crate::value_objects::Snowflake;
use thiserror::Error;

/// Errors produced by domain operations
#[derive(Debug, Error)]
pub enum DomainError {
    // ===== Not Found =====
    #[error("Conversation not found: {0}")]
    ConversationNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // ===== Forbidden =====
    #[error("User is not a member of the conversation")]
    NotAConversationMember,

    #[error("User is not the sender of the message")]
    NotMessageSender,

    // ===== Invalid Operation =====
    #[error("Cannot open a direct conversation with yourself")]
    SelfConversation,

    #[error("Message has already been deleted")]
    MessageAlreadyDeleted,

    // ===== Invalid Reference =====
    #[error("Reply target does not exist in this conversation: {0}")]
    InvalidReplyReference(Snowflake),

    // ===== Invalid Argument =====
    #[error("Page number must be >= 1, got {0}")]
    InvalidPage(i64),

    #[error("Message content must not be empty")]
    EmptyContent,

    #[error("Message content exceeds the maximum length of {max}")]
    ContentTooLong { max: usize },

    #[error("A group conversation requires at least {min} distinct members")]
    NotEnoughMembers { min: usize },

    // ===== Infrastructure =====
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConversationNotFound(_) => "CONVERSATION_NOT_FOUND",
            Self::MessageNotFound(_) => "MESSAGE_NOT_FOUND",
            Self::NotAConversationMember => "NOT_CONVERSATION_MEMBER",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",
            Self::SelfConversation => "SELF_CONVERSATION",
            Self::MessageAlreadyDeleted => "MESSAGE_DELETED",
            Self::InvalidReplyReference(_) => "INVALID_REPLY_REFERENCE",
            Self::InvalidPage(_) => "INVALID_PAGE",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::NotEnoughMembers { .. } => "NOT_ENOUGH_MEMBERS",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error means the target does not exist
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ConversationNotFound(_) | Self::MessageNotFound(_)
        )
    }

    /// Check if this error is an authorization failure
    #[inline]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::NotAConversationMember | Self::NotMessageSender)
    }

    /// Check if this error is a state-machine violation
    #[inline]
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::SelfConversation | Self::MessageAlreadyDeleted)
    }

    /// Check if this error is a dangling or cross-scope reference
    #[inline]
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReplyReference(_))
    }

    /// Check if this error is caller input that failed validation
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidPage(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::NotEnoughMembers { .. }
        )
    }

    /// Check if this error originated in infrastructure rather than the domain
    #[inline]
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::InternalError(_)
        )
    }
}
