use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::swipe::{Swipe, SwipeDirection, SwipeFilter, direction_from_db};
use chrono::{DateTime, Utc};
use uuid::Uuid;

// direction is stored as a one-letter code
#[derive(Debug, sqlx::FromRow)]
struct SwipeRow {
    id: Uuid,
    swiper_id: Uuid,
    swipee_id: Uuid,
    direction: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SwipeRow> for Swipe {
    type Error = AppError;

    fn try_from(row: SwipeRow) -> Result<Self, Self::Error> {
        Ok(Swipe {
            id: row.id,
            swiper_id: row.swiper_id,
            swipee_id: row.swipee_id,
            direction: direction_from_db(&row.direction)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait::async_trait]
pub trait SwipeRepository: Send + Sync {
    async fn create_swipe(&self, swiper_id: &Uuid, swipee_id: &Uuid, direction: SwipeDirection) -> Result<Swipe, AppError>;
    async fn get_swipe_by_id(&self, id: &Uuid) -> Result<Option<Swipe>, AppError>;
    async fn list_swipes(&self, filter: &SwipeFilter) -> Result<Vec<Swipe>, AppError>;
    async fn delete_swipe(&self, id: &Uuid) -> Result<bool, AppError>;
}

#[async_trait::async_trait]
impl SwipeRepository for PostgresRepository {
    async fn create_swipe(&self, swiper_id: &Uuid, swipee_id: &Uuid, direction: SwipeDirection) -> Result<Swipe, AppError> {
        let row = sqlx::query_as::<_, SwipeRow>(
            r#"
            INSERT INTO swipes (id, swiper_id, swipee_id, direction)
            VALUES ($1, $2, $3, $4)
            RETURNING id, swiper_id, swipee_id, direction, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(swiper_id)
        .bind(swipee_id)
        .bind(direction.as_db())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to record swipe", e))?;

        Swipe::try_from(row)
    }

    async fn get_swipe_by_id(&self, id: &Uuid) -> Result<Option<Swipe>, AppError> {
        let row = sqlx::query_as::<_, SwipeRow>(
            r#"
            SELECT id, swiper_id, swipee_id, direction, created_at
            FROM swipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Swipe::try_from).transpose()
    }

    async fn list_swipes(&self, filter: &SwipeFilter) -> Result<Vec<Swipe>, AppError> {
        let rows = sqlx::query_as::<_, SwipeRow>(
            r#"
            SELECT id, swiper_id, swipee_id, direction, created_at
            FROM swipes
            WHERE ($1::uuid IS NULL OR swiper_id = $1)
              AND ($2::uuid IS NULL OR swipee_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.swiper_id)
        .bind(filter.swipee_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Swipe::try_from).collect()
    }

    async fn delete_swipe(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM swipes WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
