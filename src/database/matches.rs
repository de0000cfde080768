use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::matches::{Match, MatchWithProfiles, UserPair};
use crate::models::profile::ProfileSummary;
use chrono::{DateTime, Utc};
use uuid::Uuid;

const MATCH_WITH_PROFILES: &str = r#"
    SELECT m.id, m.user1_id, m.user2_id, m.notes, m.archived, m.created_at,
           u1.email AS user1_email, p1.name AS user1_name, p1.age AS user1_age,
           p1.bio AS user1_bio, p1.gender AS user1_gender,
           u2.email AS user2_email, p2.name AS user2_name, p2.age AS user2_age,
           p2.bio AS user2_bio, p2.gender AS user2_gender
    FROM matches m
    JOIN users u1 ON u1.id = m.user1_id
    JOIN users u2 ON u2.id = m.user2_id
    LEFT JOIN profiles p1 ON p1.user_id = m.user1_id
    LEFT JOIN profiles p2 ON p2.user_id = m.user2_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct MatchWithProfilesRow {
    id: Uuid,
    user1_id: Uuid,
    user2_id: Uuid,
    notes: Option<String>,
    archived: bool,
    created_at: DateTime<Utc>,
    user1_email: String,
    user1_name: Option<String>,
    user1_age: Option<i32>,
    user1_bio: Option<String>,
    user1_gender: Option<String>,
    user2_email: String,
    user2_name: Option<String>,
    user2_age: Option<i32>,
    user2_bio: Option<String>,
    user2_gender: Option<String>,
}

impl From<MatchWithProfilesRow> for MatchWithProfiles {
    fn from(row: MatchWithProfilesRow) -> Self {
        MatchWithProfiles {
            user1: ProfileSummary {
                id: row.user1_id,
                email: row.user1_email,
                name: row.user1_name,
                age: row.user1_age,
                bio: row.user1_bio,
                gender: row.user1_gender,
            },
            user2: ProfileSummary {
                id: row.user2_id,
                email: row.user2_email,
                name: row.user2_name,
                age: row.user2_age,
                bio: row.user2_bio,
                gender: row.user2_gender,
            },
            record: Match {
                id: row.id,
                user1_id: row.user1_id,
                user2_id: row.user2_id,
                notes: row.notes,
                archived: row.archived,
                created_at: row.created_at,
            },
        }
    }
}

#[async_trait::async_trait]
pub trait MatchRepository: Send + Sync {
    /// Inserts the match for `pair` iff a Right swipe `swipee -> swiper` exists,
    /// as one statement. Returns `None` when the swipe is not reciprocated or the
    /// pair is already matched.
    async fn insert_match_if_reciprocal(&self, pair: &UserPair, swiper_id: &Uuid, swipee_id: &Uuid) -> Result<Option<Match>, AppError>;
    /// Insert-if-absent. Returns `None` when the pair is already matched.
    async fn insert_match(&self, pair: &UserPair) -> Result<Option<Match>, AppError>;
    async fn get_match_by_id(&self, id: &Uuid) -> Result<Option<Match>, AppError>;
    async fn get_match_with_profiles(&self, id: &Uuid) -> Result<Option<MatchWithProfiles>, AppError>;
    async fn list_matches_for_user(&self, user_id: &Uuid) -> Result<Vec<MatchWithProfiles>, AppError>;
    /// `notes: Some(None)` clears the note; `None` leaves a field untouched.
    async fn update_match(&self, id: &Uuid, notes: Option<Option<String>>, archived: Option<bool>) -> Result<Match, AppError>;
}

#[async_trait::async_trait]
impl MatchRepository for PostgresRepository {
    async fn insert_match_if_reciprocal(&self, pair: &UserPair, swiper_id: &Uuid, swipee_id: &Uuid) -> Result<Option<Match>, AppError> {
        // Each caller's swipe is committed before this runs, so under read
        // committed at least one of two racing statements sees both swipes.
        let created = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (id, user1_id, user2_id)
            SELECT $1, $2, $3
            WHERE EXISTS (
                SELECT 1 FROM swipes
                WHERE swiper_id = $4 AND swipee_id = $5 AND direction = 'R'
            )
            ON CONFLICT (user1_id, user2_id) DO NOTHING
            RETURNING id, user1_id, user2_id, notes, archived, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pair.lo())
        .bind(pair.hi())
        .bind(swipee_id)
        .bind(swiper_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to resolve match", e))?;

        Ok(created)
    }

    async fn insert_match(&self, pair: &UserPair) -> Result<Option<Match>, AppError> {
        let created = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (id, user1_id, user2_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user1_id, user2_id) DO NOTHING
            RETURNING id, user1_id, user2_id, notes, archived, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pair.lo())
        .bind(pair.hi())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to create match", e))?;

        Ok(created)
    }

    async fn get_match_by_id(&self, id: &Uuid) -> Result<Option<Match>, AppError> {
        let found = sqlx::query_as::<_, Match>(
            r#"
            SELECT id, user1_id, user2_id, notes, archived, created_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }

    async fn get_match_with_profiles(&self, id: &Uuid) -> Result<Option<MatchWithProfiles>, AppError> {
        let query = format!("{MATCH_WITH_PROFILES} WHERE m.id = $1");
        let row = sqlx::query_as::<_, MatchWithProfilesRow>(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.map(MatchWithProfiles::from))
    }

    async fn list_matches_for_user(&self, user_id: &Uuid) -> Result<Vec<MatchWithProfiles>, AppError> {
        let query = format!("{MATCH_WITH_PROFILES} WHERE m.user1_id = $1 OR m.user2_id = $1 ORDER BY m.created_at DESC");
        let rows = sqlx::query_as::<_, MatchWithProfilesRow>(&query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(MatchWithProfiles::from).collect())
    }

    async fn update_match(&self, id: &Uuid, notes: Option<Option<String>>, archived: Option<bool>) -> Result<Match, AppError> {
        let updated = sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches
            SET notes = CASE WHEN $2 THEN $3 ELSE notes END,
                archived = COALESCE($4, archived)
            WHERE id = $1
            RETURNING id, user1_id, user2_id, notes, archived, created_at
            "#,
        )
        .bind(id)
        .bind(notes.is_some())
        .bind(notes.flatten())
        .bind(archived)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}
