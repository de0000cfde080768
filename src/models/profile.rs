use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub looking_for: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a profile owner may set. Absent fields are left untouched on update.
#[derive(Deserialize, Debug, Clone, Default, Validate, JsonSchema)]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 18, max = 120))]
    pub age: Option<i32>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(custom(function = "validate_looking_for"))]
    pub looking_for: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(length(max = 2048))]
    pub profile_image: Option<String>,
}

impl ProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.bio.is_none()
            && self.gender.is_none()
            && self.looking_for.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.profile_image.is_none()
    }

    /// Applies the supplied fields onto an existing profile.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name = Some(name.clone());
        }
        if let Some(age) = self.age {
            profile.age = Some(age);
        }
        if let Some(bio) = &self.bio {
            profile.bio = Some(bio.clone());
        }
        if let Some(gender) = &self.gender {
            profile.gender = Some(gender.clone());
        }
        if let Some(looking_for) = &self.looking_for {
            profile.looking_for = Some(looking_for.clone());
        }
        if let Some(latitude) = self.latitude {
            profile.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            profile.longitude = Some(longitude);
        }
        if let Some(profile_image) = &self.profile_image {
            profile.profile_image = Some(profile_image.clone());
        }
    }
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    match value {
        "M" | "F" => Ok(()),
        _ => Err(ValidationError::new("gender must be 'M' or 'F'")),
    }
}

fn validate_looking_for(value: &str) -> Result<(), ValidationError> {
    match value {
        "M" | "F" | "A" => Ok(()),
        _ => Err(ValidationError::new("looking_for must be 'M', 'F' or 'A'")),
    }
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub looking_for: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            name: profile.name.clone(),
            age: profile.age,
            bio: profile.bio.clone(),
            gender: profile.gender.clone(),
            looking_for: profile.looking_for.clone(),
            latitude: profile.latitude,
            longitude: profile.longitude,
            profile_image: profile.profile_image.clone(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Participant card embedded in match responses.
#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub gender: Option<String>,
}
