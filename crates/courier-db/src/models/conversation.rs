//! Conversation database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the conversations table
#[derive(Debug, Clone, FromRow)]
pub struct ConversationModel {
    pub id: i64,
    pub kind: String,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationModel {
    /// Check if this is a direct conversation
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.kind == "direct"
    }
}
