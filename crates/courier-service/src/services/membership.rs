//! Membership service
//!
//! Membership checks, member listings, and read-state handling.

use courier_core::events::domain_event::ConversationReadEvent;
use courier_core::{DomainError, DomainEvent, Snowflake};
use tracing::{info, instrument};

use crate::dto::MembershipResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Ensure the conversation exists and the user belongs to it
    #[instrument(skip(self))]
    pub async fn assert_member(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        self.ctx
            .conversation_repo()
            .find_by_id(conversation_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;

        if !self
            .ctx
            .membership_repo()
            .is_member(conversation_id, user_id)
            .await?
        {
            return Err(DomainError::NotAConversationMember.into());
        }

        Ok(())
    }

    /// Get the caller's own membership in a conversation
    #[instrument(skip(self))]
    pub async fn get_membership(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<MembershipResponse> {
        let membership = self
            .ctx
            .membership_repo()
            .find(conversation_id, user_id)
            .await?
            .ok_or(DomainError::NotAConversationMember)?;

        Ok(MembershipResponse::from(&membership))
    }

    /// List all members of a conversation (members only)
    #[instrument(skip(self))]
    pub async fn list_members(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<MembershipResponse>> {
        self.assert_member(conversation_id, user_id).await?;

        let memberships = self
            .ctx
            .membership_repo()
            .find_by_conversation(conversation_id)
            .await?;

        Ok(memberships.iter().map(MembershipResponse::from).collect())
    }

    /// Zero the caller's unread counter and stamp the read time. Idempotent.
    ///
    /// The read event goes back to the caller's own channel so their other
    /// sessions can clear the badge.
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        // mark_read fails with NotAConversationMember when no row matches,
        // which also covers a missing conversation
        self.ctx
            .membership_repo()
            .mark_read(conversation_id, user_id)
            .await?;

        info!(
            conversation_id = %conversation_id,
            user_id = %user_id,
            "Conversation marked read"
        );

        let event =
            DomainEvent::ConversationRead(ConversationReadEvent::new(conversation_id, user_id));
        self.ctx.notifier().notify_users(&[user_id], &event).await;

        Ok(())
    }
}

// Used by the conversation and message services for access checks without
// re-instantiating the service
pub(crate) async fn ensure_member(
    ctx: &ServiceContext,
    conversation_id: Snowflake,
    user_id: Snowflake,
) -> ServiceResult<()> {
    MembershipService::new(ctx)
        .assert_member(conversation_id, user_id)
        .await
}

pub(crate) async fn member_ids(
    ctx: &ServiceContext,
    conversation_id: Snowflake,
) -> Result<Vec<Snowflake>, ServiceError> {
    let memberships = ctx
        .membership_repo()
        .find_by_conversation(conversation_id)
        .await?;
    Ok(memberships.into_iter().map(|m| m.user_id).collect())
}
