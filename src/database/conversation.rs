use crate::database::message::VISIBLE_MESSAGE;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::conversation::{Conversation, ConversationAccess, ConversationSummary};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Insert-if-absent keyed by match. Returns `None` when the match already has a conversation.
    async fn create_conversation(&self, match_id: &Uuid) -> Result<Option<Conversation>, AppError>;
    async fn get_conversation_access(&self, id: &Uuid) -> Result<Option<ConversationAccess>, AppError>;
    /// Conversations involving `user_id`, newest first.
    async fn list_conversation_summaries(&self, user_id: &Uuid) -> Result<Vec<ConversationSummary>, AppError>;
    /// Removes the conversation row and soft-deletes every visible message in one transaction.
    async fn delete_conversation(&self, id: &Uuid) -> Result<bool, AppError>;
}

#[async_trait::async_trait]
impl ConversationRepository for PostgresRepository {
    async fn create_conversation(&self, match_id: &Uuid) -> Result<Option<Conversation>, AppError> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (id, match_id)
            VALUES ($1, $2)
            ON CONFLICT (match_id) DO NOTHING
            RETURNING id, match_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to create conversation", e))?;

        Ok(conversation)
    }

    async fn get_conversation_access(&self, id: &Uuid) -> Result<Option<ConversationAccess>, AppError> {
        let access = sqlx::query_as::<_, ConversationAccess>(
            r#"
            SELECT c.id, c.match_id, m.user1_id, m.user2_id, c.created_at
            FROM conversations c
            JOIN matches m ON m.id = c.match_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(access)
    }

    async fn list_conversation_summaries(&self, user_id: &Uuid) -> Result<Vec<ConversationSummary>, AppError> {
        let query = format!(
            r#"
            SELECT c.id, c.match_id, other.user_id AS other_user_id, p.name AS other_user_name,
                   latest.content AS last_message, latest.created_at AS last_message_at, c.created_at
            FROM conversations c
            JOIN matches m ON m.id = c.match_id
            CROSS JOIN LATERAL (
                SELECT CASE WHEN m.user1_id = $1 THEN m.user2_id ELSE m.user1_id END AS user_id
            ) other
            LEFT JOIN profiles p ON p.user_id = other.user_id
            LEFT JOIN LATERAL (
                SELECT msg.content, msg.created_at
                FROM messages msg
                WHERE msg.conversation_id = c.id AND {VISIBLE_MESSAGE}
                ORDER BY msg.created_at DESC
                LIMIT 1
            ) latest ON TRUE
            WHERE m.user1_id = $1 OR m.user2_id = $1
            ORDER BY c.created_at DESC
            "#
        );

        let summaries = sqlx::query_as::<_, ConversationSummary>(&query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(summaries)
    }

    async fn delete_conversation(&self, id: &Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // Deleting the row first waits out any in-flight send holding it FOR SHARE,
        // so the soft delete below sees that send's message.
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1").bind(id).execute(&mut *tx).await?;

        let soft_delete = format!("UPDATE messages msg SET deleted_at = now() WHERE msg.conversation_id = $1 AND {VISIBLE_MESSAGE}");
        sqlx::query(&soft_delete).bind(id).execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
