//! Membership entity - one user's standing in one conversation

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Membership entity, keyed by (conversation_id, user_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub conversation_id: Snowflake,
    pub user_id: Snowflake,
    pub unread_count: i32,
    pub last_read_at: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    /// Create a fresh membership with no unread messages
    pub fn new(conversation_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            conversation_id,
            user_id,
            unread_count: 0,
            last_read_at: None,
            joined_at: Utc::now(),
        }
    }

    #[inline]
    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }

    /// Record an incoming message from another member
    pub fn record_incoming(&mut self) {
        self.unread_count += 1;
    }

    /// Reset the unread counter and stamp the read time. Idempotent.
    pub fn mark_read(&mut self, at: DateTime<Utc>) {
        self.unread_count = 0;
        self.last_read_at = Some(at);
    }
}
