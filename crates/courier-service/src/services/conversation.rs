//! Conversation service
//!
//! Direct-pair dedup, group creation, listings, and deletion.

use courier_core::events::domain_event::{ConversationCreatedEvent, ConversationDeletedEvent};
use courier_core::{Conversation, DomainError, DomainEvent, PageRequest, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    ConversationResponse, ConversationSummaryResponse, ConversationWithMeta, PaginatedResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::membership::{ensure_member, member_ids};

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open the direct conversation with another user, creating it on first
    /// contact.
    ///
    /// Idempotent and symmetric: both participants resolve to the same
    /// conversation no matter who opens it first. Concurrent first opens are
    /// resolved by the repository, which returns the winning row.
    #[instrument(skip(self))]
    pub async fn open_direct(
        &self,
        user_id: Snowflake,
        recipient_id: Snowflake,
    ) -> ServiceResult<ConversationResponse> {
        if user_id == recipient_id {
            return Err(DomainError::SelfConversation.into());
        }

        if let Some(existing) = self
            .ctx
            .conversation_repo()
            .find_direct(user_id, recipient_id)
            .await?
        {
            return Ok(ConversationResponse::from(existing));
        }

        let conversation = Conversation::direct(self.ctx.generate_id());
        let persisted = self
            .ctx
            .conversation_repo()
            .create_with_members(&conversation, &[user_id, recipient_id])
            .await?;

        // A lost creation race hands back the winner's row; only a fresh
        // conversation announces itself
        if persisted.id == conversation.id {
            info!(
                conversation_id = %persisted.id,
                user_id = %user_id,
                recipient_id = %recipient_id,
                "Direct conversation created"
            );

            let event = DomainEvent::ConversationCreated(ConversationCreatedEvent::new(
                persisted.id,
                user_id,
            ));
            self.ctx
                .notifier()
                .notify_users(&[user_id, recipient_id], &event)
                .await;
        }

        Ok(ConversationResponse::from(persisted))
    }

    /// Create a group conversation.
    ///
    /// The creator is always a member; duplicate IDs collapse. At least two
    /// distinct members must remain.
    #[instrument(skip(self))]
    pub async fn create_group(
        &self,
        creator_id: Snowflake,
        title: Option<String>,
        image_url: Option<String>,
        member_ids: Vec<Snowflake>,
    ) -> ServiceResult<ConversationResponse> {
        let mut members = vec![creator_id];
        for id in member_ids {
            if !members.contains(&id) {
                members.push(id);
            }
        }

        if members.len() < 2 {
            return Err(DomainError::NotEnoughMembers { min: 2 }.into());
        }

        let conversation = Conversation::group(self.ctx.generate_id(), title, image_url);
        let persisted = self
            .ctx
            .conversation_repo()
            .create_with_members(&conversation, &members)
            .await?;

        info!(
            conversation_id = %persisted.id,
            creator_id = %creator_id,
            members = members.len(),
            "Group conversation created"
        );

        let event =
            DomainEvent::ConversationCreated(ConversationCreatedEvent::new(persisted.id, creator_id));
        self.ctx.notifier().notify_users(&members, &event).await;

        Ok(ConversationResponse::from(persisted))
    }

    /// List the caller's conversations, most recently active first.
    ///
    /// An absent page size falls back to the configured default.
    #[instrument(skip(self))]
    pub async fn list_conversations(
        &self,
        user_id: Snowflake,
        page: i64,
        page_size: Option<i64>,
    ) -> ServiceResult<PaginatedResponse<ConversationSummaryResponse>> {
        let messaging = self.ctx.messaging();
        let page_size = page_size.unwrap_or(messaging.default_page_size);
        let request = PageRequest::new(page, page_size, messaging.max_page_size)?;
        let conversations = self
            .ctx
            .conversation_repo()
            .find_by_user(user_id, request)
            .await?;

        let preview_length = self.ctx.messaging().preview_length;
        let total = conversations.total;
        let mut summaries = Vec::with_capacity(conversations.items.len());
        for conversation in conversations.items {
            summaries.push(self.summarize(conversation, user_id, preview_length).await?);
        }

        Ok(PaginatedResponse::from_page(courier_core::Page {
            items: summaries,
            total,
            page: request.page(),
            page_size: request.page_size(),
        }))
    }

    /// Get a single conversation with per-viewer state (members only)
    #[instrument(skip(self))]
    pub async fn get_conversation(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ConversationSummaryResponse> {
        let conversation = self
            .ctx
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

        self.summarize(conversation, user_id, self.ctx.messaging().preview_length)
            .await
    }

    /// Delete a conversation with everything in it (members only)
    #[instrument(skip(self))]
    pub async fn delete_conversation(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        ensure_member(self.ctx, conversation_id, user_id).await?;

        // Collect recipients before the cascade wipes the membership rows
        let recipients = member_ids(self.ctx, conversation_id).await?;

        self.ctx.conversation_repo().delete(conversation_id).await?;

        info!(
            conversation_id = %conversation_id,
            deleted_by = %user_id,
            "Conversation deleted"
        );

        let event = DomainEvent::ConversationDeleted(ConversationDeletedEvent::new(
            conversation_id,
            user_id,
        ));
        self.ctx.notifier().notify_users(&recipients, &event).await;

        Ok(())
    }

    async fn summarize(
        &self,
        conversation: Conversation,
        viewer_id: Snowflake,
        preview_length: usize,
    ) -> ServiceResult<ConversationSummaryResponse> {
        let conversation_id = conversation.id;

        let membership = self
            .ctx
            .membership_repo()
            .find(conversation_id, viewer_id)
            .await?
            .ok_or_else(|| {
                ServiceError::internal(format!(
                    "membership missing for listed conversation {conversation_id}"
                ))
            })?;

        let members = member_ids(self.ctx, conversation_id).await?;
        let last_message = self.ctx.message_repo().find_latest(conversation_id).await?;

        Ok(ConversationWithMeta {
            conversation,
            member_ids: members,
            unread_count: membership.unread_count,
            last_message,
        }
        .into_summary(preview_length))
    }
}
