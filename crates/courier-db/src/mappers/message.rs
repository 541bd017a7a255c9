//! Message entity <-> model mapper

use courier_core::entities::{Message, MessageBody, MessageKind};
use courier_core::value_objects::Snowflake;

use crate::models::MessageModel;

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        let body = if model.is_deleted {
            MessageBody::Deleted
        } else {
            MessageBody::Active {
                content: model.content.unwrap_or_default(),
            }
        };

        Message {
            id: Snowflake::new(model.id),
            conversation_id: Snowflake::new(model.conversation_id),
            sender_id: Snowflake::new(model.sender_id),
            kind: MessageKind::parse(&model.message_type).unwrap_or_default(),
            body,
            reply_to: model.reply_to_id.map(Snowflake::new),
            created_at: model.created_at,
            edited_at: model.edited_at,
        }
    }
}

/// Convert Message entity reference to values for database insertion
pub struct MessageInsert<'a> {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: Option<&'a str>,
    pub message_type: &'static str,
    pub reply_to_id: Option<i64>,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            id: message.id.into_inner(),
            conversation_id: message.conversation_id.into_inner(),
            sender_id: message.sender_id.into_inner(),
            content: message.content(),
            message_type: message.kind.as_str(),
            reply_to_id: message.reply_to.map(Snowflake::into_inner),
        }
    }
}
