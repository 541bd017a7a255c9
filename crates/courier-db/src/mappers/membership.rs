//! Membership entity <-> model mapper

use courier_core::entities::Membership;
use courier_core::value_objects::Snowflake;

use crate::models::MembershipModel;

/// Convert MembershipModel to Membership entity
impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            conversation_id: Snowflake::new(model.conversation_id),
            user_id: Snowflake::new(model.user_id),
            unread_count: model.unread_count,
            last_read_at: model.last_read_at,
            joined_at: model.joined_at,
        }
    }
}
