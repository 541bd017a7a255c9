//! Mappers from domain entities to response DTOs

use courier_core::{Conversation, Membership, Message, Snowflake};

use super::responses::{
    ConversationResponse, ConversationSummaryResponse, MembershipResponse,
    MessagePreviewResponse, MessageResponse,
};

impl From<&Conversation> for ConversationResponse {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.to_string(),
            kind: conversation.kind.as_str().to_string(),
            title: conversation.title.clone(),
            image_url: conversation.image_url.clone(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self::from(&conversation)
    }
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            conversation_id: membership.conversation_id.to_string(),
            user_id: membership.user_id.to_string(),
            unread_count: membership.unread_count,
            last_read_at: membership.last_read_at,
            joined_at: membership.joined_at,
        }
    }
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            conversation_id: message.conversation_id.to_string(),
            sender_id: message.sender_id.to_string(),
            kind: message.kind.as_str().to_string(),
            content: message.content().map(ToString::to_string),
            deleted: message.is_deleted(),
            reply_to: message.reply_to.map(|id| id.to_string()),
            created_at: message.created_at,
            edited_at: message.edited_at,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}

impl MessagePreviewResponse {
    /// Build a preview entry, truncating content to `preview_length` bytes
    pub fn from_message(message: &Message, preview_length: usize) -> Self {
        Self {
            id: message.id.to_string(),
            sender_id: message.sender_id.to_string(),
            kind: message.kind.as_str().to_string(),
            preview: message.preview(preview_length).map(ToString::to_string),
            created_at: message.created_at,
        }
    }
}

/// A conversation joined with the viewer-specific state needed for listings
#[derive(Debug, Clone)]
pub struct ConversationWithMeta {
    pub conversation: Conversation,
    pub member_ids: Vec<Snowflake>,
    pub unread_count: i32,
    pub last_message: Option<Message>,
}

impl ConversationWithMeta {
    /// Convert to a summary response, truncating the last-message preview
    pub fn into_summary(self, preview_length: usize) -> ConversationSummaryResponse {
        ConversationSummaryResponse {
            id: self.conversation.id.to_string(),
            kind: self.conversation.kind.as_str().to_string(),
            title: self.conversation.title,
            image_url: self.conversation.image_url,
            member_ids: self.member_ids.iter().map(ToString::to_string).collect(),
            unread_count: self.unread_count,
            last_message: self
                .last_message
                .as_ref()
                .map(|m| MessagePreviewResponse::from_message(m, preview_length)),
            updated_at: self.conversation.updated_at,
        }
    }
}
