//! Domain events - emitted when conversation or message state changes
//!
//! Events feed the push/notification collaborator over pub/sub. The
//! payloads carry ids only; receivers fetch full state over the REST
//! surface when they need it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::MessageKind;
use crate::value_objects::Snowflake;

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Conversation Events
    // =========================================================================
    ConversationCreated(ConversationCreatedEvent),
    ConversationDeleted(ConversationDeletedEvent),
    ConversationRead(ConversationReadEvent),

    // =========================================================================
    // Message Events
    // =========================================================================
    MessageSent(MessageSentEvent),
    MessageEdited(MessageEditedEvent),
    MessageDeleted(MessageDeletedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ConversationCreated(_) => "CONVERSATION_CREATED",
            Self::ConversationDeleted(_) => "CONVERSATION_DELETED",
            Self::ConversationRead(_) => "CONVERSATION_READ",
            Self::MessageSent(_) => "MESSAGE_SENT",
            Self::MessageEdited(_) => "MESSAGE_EDITED",
            Self::MessageDeleted(_) => "MESSAGE_DELETED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ConversationCreated(e) => e.timestamp,
            Self::ConversationDeleted(e) => e.timestamp,
            Self::ConversationRead(e) => e.timestamp,
            Self::MessageSent(e) => e.timestamp,
            Self::MessageEdited(e) => e.timestamp,
            Self::MessageDeleted(e) => e.timestamp,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationCreatedEvent {
    pub conversation_id: Snowflake,
    pub created_by: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDeletedEvent {
    pub conversation_id: Snowflake,
    pub deleted_by: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationReadEvent {
    pub conversation_id: Snowflake,
    pub user_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSentEvent {
    pub message_id: Snowflake,
    pub conversation_id: Snowflake,
    pub sender_id: Snowflake,
    pub kind: String,
    /// Truncated content for notification bodies
    pub preview: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEditedEvent {
    pub message_id: Snowflake,
    pub conversation_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeletedEvent {
    pub message_id: Snowflake,
    pub conversation_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Event Creation Helpers
// ============================================================================

impl ConversationCreatedEvent {
    pub fn new(conversation_id: Snowflake, created_by: Snowflake) -> Self {
        Self {
            conversation_id,
            created_by,
            timestamp: Utc::now(),
        }
    }
}

impl ConversationDeletedEvent {
    pub fn new(conversation_id: Snowflake, deleted_by: Snowflake) -> Self {
        Self {
            conversation_id,
            deleted_by,
            timestamp: Utc::now(),
        }
    }
}

impl ConversationReadEvent {
    pub fn new(conversation_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            conversation_id,
            user_id,
            timestamp: Utc::now(),
        }
    }
}

impl MessageSentEvent {
    pub fn new(
        message_id: Snowflake,
        conversation_id: Snowflake,
        sender_id: Snowflake,
        kind: MessageKind,
        preview: Option<String>,
    ) -> Self {
        Self {
            message_id,
            conversation_id,
            sender_id,
            kind: kind.as_str().to_string(),
            preview,
            timestamp: Utc::now(),
        }
    }
}

impl MessageEditedEvent {
    pub fn new(message_id: Snowflake, conversation_id: Snowflake) -> Self {
        Self {
            message_id,
            conversation_id,
            timestamp: Utc::now(),
        }
    }
}

impl MessageDeletedEvent {
    pub fn new(message_id: Snowflake, conversation_id: Snowflake) -> Self {
        Self {
            message_id,
            conversation_id,
            timestamp: Utc::now(),
        }
    }
}
