//! Message entity with tagged soft-delete state

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Kind of message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Text,
    /// Content carries the object-storage URL, never image bytes
    Image,
    /// Server-generated notice (e.g. conversation events)
    System,
}

impl MessageKind {
    /// Database/wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::System => "system",
        }
    }

    /// Parse the database/wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message content state.
///
/// Deletion replaces the content wholesale; a deleted message keeps its
/// row (and stays addressable as a reply target) but carries no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Active { content: String },
    Deleted,
}

impl MessageBody {
    /// Content, if the message is still active
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Active { content } => Some(content),
            Self::Deleted => None,
        }
    }

    #[inline]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub conversation_id: Snowflake,
    pub sender_id: Snowflake,
    pub kind: MessageKind,
    pub body: MessageBody,
    pub reply_to: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new active message
    pub fn new(
        id: Snowflake,
        conversation_id: Snowflake,
        sender_id: Snowflake,
        kind: MessageKind,
        content: String,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender_id,
            kind,
            body: MessageBody::Active { content },
            reply_to: None,
            created_at: Utc::now(),
            edited_at: None,
        }
    }

    /// Attach a reply target
    pub fn with_reply_to(mut self, reply_to: Snowflake) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    #[inline]
    pub const fn is_deleted(&self) -> bool {
        self.body.is_deleted()
    }

    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    #[inline]
    pub const fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }

    /// Content, if the message is still active
    pub fn content(&self) -> Option<&str> {
        self.body.content()
    }

    /// Truncated content for conversation previews and notifications
    pub fn preview(&self, max_len: usize) -> Option<&str> {
        let content = self.body.content()?;
        if content.len() <= max_len {
            return Some(content);
        }
        let mut end = max_len;
        while !content.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        Some(&content[..end])
    }

    /// Replace the content and stamp the edit time.
    ///
    /// Deleted messages cannot be edited.
    pub fn edit(&mut self, content: String, at: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_deleted() {
            return Err(DomainError::MessageAlreadyDeleted);
        }
        self.body = MessageBody::Active { content };
        self.edited_at = Some(at);
        Ok(())
    }

    /// Flip the message to its deleted state, discarding the content.
    pub fn delete(&mut self) -> Result<(), DomainError> {
        if self.is_deleted() {
            return Err(DomainError::MessageAlreadyDeleted);
        }
        self.body = MessageBody::Deleted;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_message(content: &str) -> Message {
        Message::new(
            Snowflake::new(1),
            Snowflake::new(100),
            Snowflake::new(200),
            MessageKind::Text,
            content.to_string(),
        )
    }

    #[test]
    fn test_message_creation() {
        let msg = text_message("Hello, world!");
        assert!(!msg.is_deleted());
        assert!(!msg.is_edited());
        assert!(!msg.is_reply());
        assert_eq!(msg.content(), Some("Hello, world!"));
    }

    #[test]
    fn test_message_reply() {
        let msg = text_message("a reply").with_reply_to(Snowflake::new(9));
        assert!(msg.is_reply());
        assert_eq!(msg.reply_to, Some(Snowflake::new(9)));
    }

    #[test]
    fn test_message_edit() {
        let mut msg = text_message("Original");
        let at = Utc::now();
        msg.edit("Edited".to_string(), at).unwrap();
        assert!(msg.is_edited());
        assert_eq!(msg.content(), Some("Edited"));
        assert_eq!(msg.edited_at, Some(at));
    }

    #[test]
    fn test_edit_after_delete_fails() {
        let mut msg = text_message("Original");
        msg.delete().unwrap();
        let err = msg.edit("Too late".to_string(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::MessageAlreadyDeleted));
    }

    #[test]
    fn test_delete_is_not_idempotent() {
        let mut msg = text_message("Doomed");
        msg.delete().unwrap();
        assert!(msg.is_deleted());
        assert_eq!(msg.content(), None);

        let err = msg.delete().unwrap_err();
        assert!(matches!(err, DomainError::MessageAlreadyDeleted));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let msg = text_message("Hello, world!");
        assert_eq!(msg.preview(5), Some("Hello"));
        assert_eq!(msg.preview(100), Some("Hello, world!"));

        // Multi-byte content must not be split mid-character
        let msg = text_message("안녕하세요");
        let preview = msg.preview(4).unwrap();
        assert!(preview.len() <= 4);
        assert!(msg.content().unwrap().starts_with(preview));
    }

    #[test]
    fn test_deleted_message_has_no_preview() {
        let mut msg = text_message("Gone");
        msg.delete().unwrap();
        assert_eq!(msg.preview(10), None);
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(MessageKind::parse("text"), Some(MessageKind::Text));
        assert_eq!(MessageKind::parse("image"), Some(MessageKind::Image));
        assert_eq!(MessageKind::parse("system"), Some(MessageKind::System));
        assert_eq!(MessageKind::parse("video"), None);
    }
}
