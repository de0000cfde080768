use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::session::{NewSession, Session};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &NewSession) -> Result<Session, AppError>;
    async fn get_session(&self, session_id: &Uuid, user_id: &Uuid) -> Result<Option<Session>, AppError>;
    /// Returns whether a live session was revoked by this call.
    async fn revoke_session(&self, session_id: &Uuid, revoked_at: DateTime<Utc>) -> Result<bool, AppError>;
}

#[async_trait::async_trait]
impl SessionRepository for PostgresRepository {
    async fn create_session(&self, session: &NewSession) -> Result<Session, AppError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, token, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token, created_at, expires_at, revoked_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.token)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to create session", e))?;

        Ok(session)
    }

    async fn get_session(&self, session_id: &Uuid, user_id: &Uuid) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, token, created_at, expires_at, revoked_at
            FROM sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn revoke_session(&self, session_id: &Uuid, revoked_at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE sessions SET revoked_at = $2 WHERE id = $1 AND revoked_at IS NULL")
            .bind(session_id)
            .bind(revoked_at)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
