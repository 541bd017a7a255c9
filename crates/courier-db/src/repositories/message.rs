//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use courier_core::entities::Message;
use courier_core::traits::{MessageRepository, RepoResult};
use courier_core::value_objects::{Page, PageRequest, Snowflake};

use crate::mappers::MessageInsert;
use crate::models::MessageModel;

use super::error::{conversation_not_found, map_db_error, message_not_found};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        // Deleted rows are returned too; callers decide how to treat
        // tombstones
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, conversation_id, sender_id, content, message_type,
                   reply_to_id, is_deleted, created_at, edited_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        let insert = MessageInsert::new(message);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, message_type, reply_to_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(insert.id)
        .bind(insert.conversation_id)
        .bind(insert.sender_id)
        .bind(insert.content)
        .bind(insert.message_type)
        .bind(insert.reply_to_id)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let bumped = sqlx::query(
            r#"
            UPDATE conversations
            SET updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(insert.conversation_id)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if bumped.rows_affected() == 0 {
            return Err(conversation_not_found(message.conversation_id));
        }

        sqlx::query(
            r#"
            UPDATE conversation_members
            SET unread_count = unread_count + 1
            WHERE conversation_id = $1 AND user_id <> $2
            "#,
        )
        .bind(insert.conversation_id)
        .bind(insert.sender_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Page<Message>> {
        // Tombstones count toward the total so page boundaries are
        // stable under deletion
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE conversation_id = $1
            "#,
        )
        .bind(conversation_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, conversation_id, sender_id, content, message_type,
                   reply_to_id, is_deleted, created_at, edited_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(conversation_id.into_inner())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let items = results.into_iter().map(Message::from).collect();
        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self))]
    async fn find_latest(&self, conversation_id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, conversation_id, sender_id, content, message_type,
                   reply_to_id, is_deleted, created_at, edited_at
            FROM messages
            WHERE conversation_id = $1 AND is_deleted = FALSE
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self, message))]
    async fn update_content(&self, message: &Message) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET content = $2, edited_at = $3
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.content())
        .bind(message.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(message.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_deleted = TRUE, content = NULL, deleted_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }
}
