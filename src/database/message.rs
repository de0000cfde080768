use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::message::Message;
use uuid::Uuid;

/// Non-deleted predicate shared by every message read path. Queries alias
/// `messages` as `msg`.
pub const VISIBLE_MESSAGE: &str = "msg.deleted_at IS NULL";

const MESSAGE_WITH_SENDER: &str = r#"
    SELECT msg.id, msg.conversation_id, msg.sender_id, p.name AS sender_name,
           msg.content, msg.created_at, msg.deleted_at
    FROM messages msg
    LEFT JOIN profiles p ON p.user_id = msg.sender_id
"#;

#[async_trait::async_trait]
pub trait MessageRepository: Send + Sync {
    /// Inserts only while the conversation exists. Returns `None` once it is gone.
    async fn create_message(&self, conversation_id: &Uuid, sender_id: &Uuid, content: &str) -> Result<Option<Message>, AppError>;
    async fn get_message_by_id(&self, id: &Uuid) -> Result<Option<Message>, AppError>;
    /// Visible messages of a conversation, oldest first.
    async fn list_visible_messages(&self, conversation_id: &Uuid) -> Result<Vec<Message>, AppError>;
    /// A newest-first page of visible messages plus the visible total.
    async fn page_visible_messages(&self, conversation_id: &Uuid, limit: i64, offset: i64) -> Result<(Vec<Message>, i64), AppError>;
    /// Rewrites content iff the message is the sender's and still visible.
    async fn edit_message(&self, id: &Uuid, sender_id: &Uuid, content: &str) -> Result<Option<Message>, AppError>;
    /// Stamps `deleted_at` iff the message is the sender's and still visible.
    async fn soft_delete_message(&self, id: &Uuid, sender_id: &Uuid) -> Result<bool, AppError>;
}

#[async_trait::async_trait]
impl MessageRepository for PostgresRepository {
    async fn create_message(&self, conversation_id: &Uuid, sender_id: &Uuid, content: &str) -> Result<Option<Message>, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            WITH live AS (
                SELECT id FROM conversations WHERE id = $2 FOR SHARE
            ),
            msg AS (
                INSERT INTO messages (id, conversation_id, sender_id, content)
                SELECT $1, live.id, $3, $4 FROM live
                RETURNING id, conversation_id, sender_id, content, created_at, deleted_at
            )
            SELECT msg.id, msg.conversation_id, msg.sender_id, p.name AS sender_name,
                   msg.content, msg.created_at, msg.deleted_at
            FROM msg
            LEFT JOIN profiles p ON p.user_id = msg.sender_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to send message", e))?;

        Ok(message)
    }

    async fn get_message_by_id(&self, id: &Uuid) -> Result<Option<Message>, AppError> {
        let query = format!("{MESSAGE_WITH_SENDER} WHERE msg.id = $1");
        let message = sqlx::query_as::<_, Message>(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(message)
    }

    async fn list_visible_messages(&self, conversation_id: &Uuid) -> Result<Vec<Message>, AppError> {
        let query = format!("{MESSAGE_WITH_SENDER} WHERE msg.conversation_id = $1 AND {VISIBLE_MESSAGE} ORDER BY msg.created_at ASC, msg.id ASC");
        let messages = sqlx::query_as::<_, Message>(&query).bind(conversation_id).fetch_all(&self.pool).await?;

        Ok(messages)
    }

    async fn page_visible_messages(&self, conversation_id: &Uuid, limit: i64, offset: i64) -> Result<(Vec<Message>, i64), AppError> {
        #[derive(sqlx::FromRow)]
        struct CountRow {
            total: i64,
        }

        let count_query = format!("SELECT COUNT(*) AS total FROM messages msg WHERE msg.conversation_id = $1 AND {VISIBLE_MESSAGE}");
        let count_row = sqlx::query_as::<_, CountRow>(&count_query).bind(conversation_id).fetch_one(&self.pool).await?;

        let query = format!(
            "{MESSAGE_WITH_SENDER} WHERE msg.conversation_id = $1 AND {VISIBLE_MESSAGE} ORDER BY msg.created_at DESC, msg.id DESC LIMIT $2 OFFSET $3"
        );
        let messages = sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((messages, count_row.total))
    }

    async fn edit_message(&self, id: &Uuid, sender_id: &Uuid, content: &str) -> Result<Option<Message>, AppError> {
        let query = format!(
            r#"
            WITH msg AS (
                UPDATE messages msg
                SET content = $3
                WHERE msg.id = $1 AND msg.sender_id = $2 AND {VISIBLE_MESSAGE}
                RETURNING msg.id, msg.conversation_id, msg.sender_id, msg.content, msg.created_at, msg.deleted_at
            )
            SELECT msg.id, msg.conversation_id, msg.sender_id, p.name AS sender_name,
                   msg.content, msg.created_at, msg.deleted_at
            FROM msg
            LEFT JOIN profiles p ON p.user_id = msg.sender_id
            "#
        );

        let message = sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .bind(sender_id)
            .bind(content)
            .fetch_optional(&self.pool)
            .await?;

        Ok(message)
    }

    async fn soft_delete_message(&self, id: &Uuid, sender_id: &Uuid) -> Result<bool, AppError> {
        let query = format!("UPDATE messages msg SET deleted_at = now() WHERE msg.id = $1 AND msg.sender_id = $2 AND {VISIBLE_MESSAGE}");
        let result = sqlx::query(&query).bind(id).bind(sender_id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
