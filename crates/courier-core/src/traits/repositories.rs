//! Repository traits - persistence ports for the domain layer

use async_trait::async_trait;

use crate::entities::{Conversation, Membership, Message};
use crate::error::DomainError;
use crate::value_objects::{Page, PageRequest, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Conversation persistence operations
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find a conversation by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>>;

    /// Find the direct conversation between two users, regardless of argument order
    async fn find_direct(&self, user_a: Snowflake, user_b: Snowflake)
        -> RepoResult<Option<Conversation>>;

    /// Insert a conversation together with its initial memberships in one
    /// transaction.
    ///
    /// For direct conversations the unique pair key may collide with a
    /// concurrent creator; implementations resolve that race by returning
    /// the already-persisted conversation instead of an error.
    async fn create_with_members(
        &self,
        conversation: &Conversation,
        member_ids: &[Snowflake],
    ) -> RepoResult<Conversation>;

    /// List a user's conversations, most recently active first
    async fn find_by_user(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Page<Conversation>>;

    /// Delete a conversation, cascading memberships and messages
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

/// Membership persistence operations
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find one membership row
    async fn find(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>>;

    /// All memberships of a conversation
    async fn find_by_conversation(&self, conversation_id: Snowflake)
        -> RepoResult<Vec<Membership>>;

    /// Check membership without loading the row
    async fn is_member(&self, conversation_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Zero the unread counter and stamp last_read_at. Idempotent.
    async fn mark_read(&self, conversation_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;
}

/// Message persistence operations
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find a message by ID, deleted or not
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Insert a message, bump the conversation's updated_at, and increment
    /// every other member's unread counter, all in one transaction.
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// One page of a conversation's messages ordered by
    /// (created_at DESC, id DESC). Deleted messages are included.
    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Page<Message>>;

    /// The newest non-deleted message of a conversation, if any
    async fn find_latest(&self, conversation_id: Snowflake) -> RepoResult<Option<Message>>;

    /// Persist an edited message's content and edited_at
    async fn update_content(&self, message: &Message) -> RepoResult<()>;

    /// Flip a message to its deleted state, keeping the row
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()>;
}
