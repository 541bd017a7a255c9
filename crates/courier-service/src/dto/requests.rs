//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; those with field-level
//! constraints also implement `Validate`. Content length and membership
//! rules are enforced in the service layer against the runtime
//! configuration, not here.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Conversation Requests
// ============================================================================

/// Open (or return the existing) direct conversation with a user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDirectRequest {
    /// Recipient user ID (Snowflake as string)
    pub recipient_id: String,
}

/// Create a group conversation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    /// Image URL for the group avatar
    #[validate(length(max = 2048, message = "Image URL must be at most 2048 characters"))]
    pub image_url: Option<String>,

    /// Member user IDs (Snowflakes as strings); the creator is always included
    pub member_ids: Vec<String>,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send a message to a conversation
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,

    /// Message kind: text, image, or system (defaults to text)
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// ID of the message being replied to (Snowflake as string)
    pub reply_to: Option<String>,
}

/// Edit a message's content
#[derive(Debug, Clone, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}
