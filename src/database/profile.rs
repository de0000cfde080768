use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::profile::{Profile, ProfileRequest};
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "id, user_id, name, age, bio, gender, looking_for, latitude, longitude, profile_image, created_at, updated_at";

#[async_trait::async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns `None` when the user already owns a profile.
    async fn create_profile(&self, user_id: &Uuid, request: &ProfileRequest) -> Result<Option<Profile>, AppError>;
    async fn get_profile_by_id(&self, id: &Uuid) -> Result<Option<Profile>, AppError>;
    async fn get_profile_by_user_id(&self, user_id: &Uuid) -> Result<Option<Profile>, AppError>;
    /// Lists `only_user`'s profile when given, otherwise every profile except `excluding`'s.
    async fn list_profiles(&self, only_user: Option<&Uuid>, excluding: &Uuid) -> Result<Vec<Profile>, AppError>;
    /// Sets only the fields present in `request`. Returns `None` when the profile is gone.
    async fn update_profile(&self, id: &Uuid, request: &ProfileRequest) -> Result<Option<Profile>, AppError>;
    async fn delete_profile(&self, id: &Uuid) -> Result<bool, AppError>;
}

#[async_trait::async_trait]
impl ProfileRepository for PostgresRepository {
    async fn create_profile(&self, user_id: &Uuid, request: &ProfileRequest) -> Result<Option<Profile>, AppError> {
        let query = format!(
            r#"
            INSERT INTO profiles (id, user_id, name, age, bio, gender, looking_for, latitude, longitude, profile_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&request.name)
            .bind(request.age)
            .bind(&request.bio)
            .bind(&request.gender)
            .bind(&request.looking_for)
            .bind(request.latitude)
            .bind(request.longitude)
            .bind(&request.profile_image)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::db("Failed to create profile", e))?;

        Ok(profile)
    }

    async fn get_profile_by_id(&self, id: &Uuid) -> Result<Option<Profile>, AppError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        let profile = sqlx::query_as::<_, Profile>(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(profile)
    }

    async fn get_profile_by_user_id(&self, user_id: &Uuid) -> Result<Option<Profile>, AppError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
        let profile = sqlx::query_as::<_, Profile>(&query).bind(user_id).fetch_optional(&self.pool).await?;

        Ok(profile)
    }

    async fn list_profiles(&self, only_user: Option<&Uuid>, excluding: &Uuid) -> Result<Vec<Profile>, AppError> {
        let profiles = match only_user {
            Some(user_id) => {
                let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
                sqlx::query_as::<_, Profile>(&query).bind(user_id).fetch_all(&self.pool).await?
            }
            None => {
                let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id <> $1 ORDER BY created_at DESC");
                sqlx::query_as::<_, Profile>(&query).bind(excluding).fetch_all(&self.pool).await?
            }
        };

        Ok(profiles)
    }

    async fn update_profile(&self, id: &Uuid, request: &ProfileRequest) -> Result<Option<Profile>, AppError> {
        let query = format!(
            r#"
            UPDATE profiles
            SET name = COALESCE($2, name),
                age = COALESCE($3, age),
                bio = COALESCE($4, bio),
                gender = COALESCE($5, gender),
                looking_for = COALESCE($6, looking_for),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                profile_image = COALESCE($9, profile_image),
                updated_at = now()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&request.name)
            .bind(request.age)
            .bind(&request.bio)
            .bind(&request.gender)
            .bind(&request.looking_for)
            .bind(request.latitude)
            .bind(request.longitude)
            .bind(&request.profile_image)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::db("Failed to update profile", e))?;

        Ok(updated)
    }

    async fn delete_profile(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1").bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
