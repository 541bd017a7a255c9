//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use courier_core::entities::Membership;
use courier_core::error::DomainError;
use courier_core::traits::{MembershipRepository, RepoResult};
use courier_core::value_objects::Snowflake;

use crate::models::MembershipModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT conversation_id, user_id, unread_count, last_read_at, joined_at
            FROM conversation_members
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Membership::from))
    }

    #[instrument(skip(self))]
    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
    ) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT conversation_id, user_id, unread_count, last_read_at, joined_at
            FROM conversation_members
            WHERE conversation_id = $1
            ORDER BY joined_at ASC, user_id ASC
            "#,
        )
        .bind(conversation_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Membership::from).collect())
    }

    #[instrument(skip(self))]
    async fn is_member(&self, conversation_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM conversation_members
                WHERE conversation_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, conversation_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE conversation_members
            SET unread_count = 0, last_read_at = NOW()
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotAConversationMember);
        }

        Ok(())
    }
}
