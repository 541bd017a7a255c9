//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the messages table
///
/// `content` is NULL exactly when `is_deleted` is true; the mapper
/// collapses the pair into the entity's tagged body.
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: Option<String>,
    pub message_type: String,
    pub reply_to_id: Option<i64>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl MessageModel {
    /// Check if message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Check if message is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.reply_to_id.is_some()
    }
}
