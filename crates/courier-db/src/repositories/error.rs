//! Error handling utilities for repositories

use courier_core::error::DomainError;
use courier_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "conversation not found" error
pub fn conversation_not_found(id: Snowflake) -> DomainError {
    DomainError::ConversationNotFound(id)
}

/// Create a "message not found" error
pub fn message_not_found(id: Snowflake) -> DomainError {
    DomainError::MessageNotFound(id)
}
