//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the conversation_members table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub conversation_id: i64,
    pub user_id: i64,
    pub unread_count: i32,
    pub last_read_at: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
}

impl MembershipModel {
    /// Check if the member has unread messages
    #[inline]
    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }
}
