use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::app_error::AppError;
use crate::models::profile::ProfileSummary;

/// An unordered pair of distinct users stored as `(lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserPair {
    lo: Uuid,
    hi: Uuid,
}

impl UserPair {
    pub fn new(a: Uuid, b: Uuid) -> Result<Self, AppError> {
        if a == b {
            return Err(AppError::bad_request("cannot create a match with yourself"));
        }
        Ok(if a < b { Self { lo: a, hi: b } } else { Self { lo: b, hi: a } })
    }

    pub fn lo(&self) -> Uuid {
        self.lo
    }

    pub fn hi(&self) -> Uuid {
        self.hi
    }

    pub fn contains(&self, user_id: &Uuid) -> bool {
        self.lo == *user_id || self.hi == *user_id
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Match {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub notes: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn has_participant(&self, user_id: &Uuid) -> bool {
        self.user1_id == *user_id || self.user2_id == *user_id
    }

    pub fn other_participant(&self, user_id: &Uuid) -> Uuid {
        if self.user1_id == *user_id { self.user2_id } else { self.user1_id }
    }
}

/// A match joined with both participants' profile cards.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchWithProfiles {
    pub record: Match,
    pub user1: ProfileSummary,
    pub user2: ProfileSummary,
}

#[derive(Deserialize, Debug, JsonSchema)]
pub struct MatchRequest {
    pub user1_id: Uuid,
    pub user2_id: Uuid,
}

/// Partial update. `notes` set to blank clears the note.
#[derive(Deserialize, Debug, Default, Validate, JsonSchema)]
pub struct MatchUpdateRequest {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub archived: Option<bool>,
}

impl MatchUpdateRequest {
    pub fn normalized_notes(&self) -> Option<Option<String>> {
        self.notes.as_ref().map(|notes| {
            let trimmed = notes.trim();
            if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
        })
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct MatchResponse {
    pub id: Uuid,
    pub user1: ProfileSummary,
    pub user2: ProfileSummary,
    pub notes: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&MatchWithProfiles> for MatchResponse {
    fn from(value: &MatchWithProfiles) -> Self {
        Self {
            id: value.record.id,
            user1: value.user1.clone(),
            user2: value.user2.clone(),
            notes: value.record.notes.clone(),
            archived: value.record.archived,
            created_at: value.record.created_at,
        }
    }
}
