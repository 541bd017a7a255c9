//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use courier_core::entities::{direct_pair_key, Conversation};
use courier_core::traits::{ConversationRepository, RepoResult};
use courier_core::value_objects::{Page, PageRequest, Snowflake};

use crate::models::ConversationModel;

use super::error::{conversation_not_found, map_db_error};

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_direct_key(&self, key: &str) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT id, kind, title, image_url, created_at, updated_at
            FROM conversations
            WHERE direct_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT id, kind, title, image_url, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_direct(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Conversation>> {
        self.find_by_direct_key(&direct_pair_key(user_a, user_b))
            .await
    }

    #[instrument(skip(self, conversation))]
    async fn create_with_members(
        &self,
        conversation: &Conversation,
        member_ids: &[Snowflake],
    ) -> RepoResult<Conversation> {
        // Direct conversations carry a canonical pair key so the unique
        // index serializes concurrent creators
        let direct_key = match (conversation.is_direct(), member_ids) {
            (true, [a, b]) => Some(direct_pair_key(*a, *b)),
            _ => None,
        };

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO conversations (id, kind, title, image_url, direct_key, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(conversation.id.into_inner())
        .bind(conversation.kind.as_str())
        .bind(conversation.title.as_deref())
        .bind(conversation.image_url.as_deref())
        .bind(direct_key.as_deref())
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            let lost_race = e
                .as_database_error()
                .is_some_and(sqlx::error::DatabaseError::is_unique_violation);

            if lost_race {
                // A concurrent creator won; hand back their row
                drop(tx);
                if let Some(key) = direct_key {
                    if let Some(existing) = self.find_by_direct_key(&key).await? {
                        return Ok(existing);
                    }
                }
            }
            return Err(map_db_error(e));
        }

        for user_id in member_ids {
            sqlx::query(
                r#"
                INSERT INTO conversation_members (conversation_id, user_id, unread_count, joined_at)
                VALUES ($1, $2, 0, $3)
                "#,
            )
            .bind(conversation.id.into_inner())
            .bind(user_id.into_inner())
            .bind(conversation.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(conversation.clone())
    }

    #[instrument(skip(self))]
    async fn find_by_user(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Page<Conversation>> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM conversation_members
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let results = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT c.id, c.kind, c.title, c.image_url, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_members m ON m.conversation_id = c.id
            WHERE m.user_id = $1
            ORDER BY c.updated_at DESC, c.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let items = results.into_iter().map(Conversation::from).collect();
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // Memberships and messages cascade at the schema level
        let result = sqlx::query(
            r#"
            DELETE FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }
}
