//! Message service
//!
//! Sending, paging, editing, and soft-deleting messages.

use chrono::Utc;
use courier_core::events::domain_event::{
    MessageDeletedEvent, MessageEditedEvent, MessageSentEvent,
};
use courier_core::{DomainError, DomainEvent, Message, MessageKind, PageRequest, Snowflake};
use tracing::{info, instrument};

use crate::dto::{MessageResponse, PaginatedResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::membership::{ensure_member, member_ids};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a message to a conversation (members only).
    ///
    /// A reply target must exist in the same conversation; replying to a
    /// deleted message is allowed, its tombstone stays addressable.
    #[instrument(skip(self, content))]
    pub async fn send_message(
        &self,
        conversation_id: Snowflake,
        sender_id: Snowflake,
        content: String,
        kind: MessageKind,
        reply_to: Option<Snowflake>,
    ) -> ServiceResult<MessageResponse> {
        ensure_member(self.ctx, conversation_id, sender_id).await?;
        self.validate_content(&content)?;

        if let Some(target_id) = reply_to {
            let target = self
                .ctx
                .message_repo()
                .find_by_id(target_id)
                .await?
                .ok_or(DomainError::InvalidReplyReference(target_id))?;
            if target.conversation_id != conversation_id {
                return Err(DomainError::InvalidReplyReference(target_id).into());
            }
        }

        let mut message = Message::new(
            self.ctx.generate_id(),
            conversation_id,
            sender_id,
            kind,
            content,
        );
        if let Some(target_id) = reply_to {
            message = message.with_reply_to(target_id);
        }

        self.ctx.message_repo().create(&message).await?;

        info!(
            message_id = %message.id,
            conversation_id = %conversation_id,
            sender_id = %sender_id,
            kind = %kind,
            "Message sent"
        );

        let recipients = self.other_members(conversation_id, sender_id).await?;
        let event = DomainEvent::MessageSent(MessageSentEvent::new(
            message.id,
            conversation_id,
            sender_id,
            kind,
            message
                .preview(self.ctx.messaging().preview_length)
                .map(ToString::to_string),
        ));
        self.ctx.notifier().notify_users(&recipients, &event).await;

        Ok(MessageResponse::from(message))
    }

    /// One page of a conversation's messages, newest first (members only).
    ///
    /// Deleted messages keep their slot so page boundaries stay stable. An
    /// absent page size falls back to the configured default.
    #[instrument(skip(self))]
    pub async fn get_messages(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
        page: i64,
        page_size: Option<i64>,
    ) -> ServiceResult<PaginatedResponse<MessageResponse>> {
        ensure_member(self.ctx, conversation_id, user_id).await?;

        let messaging = self.ctx.messaging();
        let page_size = page_size.unwrap_or(messaging.default_page_size);
        let request = PageRequest::new(page, page_size, messaging.max_page_size)?;
        let messages = self
            .ctx
            .message_repo()
            .find_by_conversation(conversation_id, request)
            .await?;

        Ok(PaginatedResponse::from_page(
            messages.map(MessageResponse::from),
        ))
    }

    /// Edit a message's content (sender only)
    #[instrument(skip(self, content))]
    pub async fn edit_message(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        content: String,
    ) -> ServiceResult<MessageResponse> {
        let mut message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if message.sender_id != user_id {
            return Err(DomainError::NotMessageSender.into());
        }

        self.validate_content(&content)?;
        message.edit(content, Utc::now())?;
        self.ctx.message_repo().update_content(&message).await?;

        info!(
            message_id = %message_id,
            conversation_id = %message.conversation_id,
            "Message edited"
        );

        let recipients = self
            .other_members(message.conversation_id, user_id)
            .await?;
        let event = DomainEvent::MessageEdited(MessageEditedEvent::new(
            message_id,
            message.conversation_id,
        ));
        self.ctx.notifier().notify_users(&recipients, &event).await;

        Ok(MessageResponse::from(message))
    }

    /// Soft-delete a message (sender only).
    ///
    /// The row survives as a tombstone; deleting it twice is an error.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        let mut message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if message.sender_id != user_id {
            return Err(DomainError::NotMessageSender.into());
        }

        // Rejects the second delete with MessageAlreadyDeleted
        message.delete()?;
        self.ctx.message_repo().soft_delete(message_id).await?;

        info!(
            message_id = %message_id,
            conversation_id = %message.conversation_id,
            "Message deleted"
        );

        let recipients = self
            .other_members(message.conversation_id, user_id)
            .await?;
        let event = DomainEvent::MessageDeleted(MessageDeletedEvent::new(
            message_id,
            message.conversation_id,
        ));
        self.ctx.notifier().notify_users(&recipients, &event).await;

        Ok(())
    }

    fn validate_content(&self, content: &str) -> ServiceResult<()> {
        if content.trim().is_empty() {
            return Err(DomainError::EmptyContent.into());
        }
        let max = self.ctx.messaging().max_message_length;
        if content.chars().count() > max {
            return Err(DomainError::ContentTooLong { max }.into());
        }
        Ok(())
    }

    async fn other_members(
        &self,
        conversation_id: Snowflake,
        except: Snowflake,
    ) -> ServiceResult<Vec<Snowflake>> {
        let members = member_ids(self.ctx, conversation_id).await?;
        Ok(members.into_iter().filter(|&id| id != except).collect())
    }
}
