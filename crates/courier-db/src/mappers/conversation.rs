//! Conversation entity <-> model mapper

use courier_core::entities::{Conversation, ConversationKind};
use courier_core::value_objects::Snowflake;

use crate::models::ConversationModel;

/// Convert ConversationModel to Conversation entity
impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        // The kind column carries a CHECK constraint, so parse cannot
        // miss on rows the schema accepts
        let kind = ConversationKind::parse(&model.kind).unwrap_or(ConversationKind::Group);
        Conversation {
            id: Snowflake::new(model.id),
            kind,
            title: model.title,
            image_url: model.image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
