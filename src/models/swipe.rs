use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::app_error::AppError;
use crate::models::matches::MatchResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SwipeDirection {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl SwipeDirection {
    /// Accepts `l`/`L`/`r`/`R`, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_uppercase().as_str() {
            "L" => Ok(SwipeDirection::Left),
            "R" => Ok(SwipeDirection::Right),
            _ => Err(AppError::bad_request("direction must be 'L' or 'R'")),
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            SwipeDirection::Left => "L",
            SwipeDirection::Right => "R",
        }
    }
}

pub fn direction_from_db(value: &str) -> Result<SwipeDirection, AppError> {
    match value {
        "R" => Ok(SwipeDirection::Right),
        "L" => Ok(SwipeDirection::Left),
        other => Err(AppError::db(
            "Unknown swipe direction in ledger",
            sqlx::Error::Decode(format!("unexpected direction code {other:?}").into()),
        )),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swipe {
    pub id: Uuid,
    pub swiper_id: Uuid,
    pub swipee_id: Uuid,
    pub direction: SwipeDirection,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct SwipeRequest {
    pub swipee_id: Uuid,
    #[validate(length(min = 1, message = "direction required"))]
    pub direction: String,
}

/// Optional filters for listing swipes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeFilter {
    pub swiper_id: Option<Uuid>,
    pub swipee_id: Option<Uuid>,
}

impl SwipeFilter {
    pub fn matches(&self, swipe: &Swipe) -> bool {
        self.swiper_id.is_none_or(|id| id == swipe.swiper_id) && self.swipee_id.is_none_or(|id| id == swipe.swipee_id)
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct SwipeResponse {
    pub id: Uuid,
    pub swiper_id: Uuid,
    pub swipee_id: Uuid,
    pub direction: SwipeDirection,
    pub created_at: DateTime<Utc>,
}

impl From<&Swipe> for SwipeResponse {
    fn from(swipe: &Swipe) -> Self {
        Self {
            id: swipe.id,
            swiper_id: swipe.swiper_id,
            swipee_id: swipe.swipee_id,
            direction: swipe.direction,
            created_at: swipe.created_at,
        }
    }
}

/// Result of recording a swipe: the ledger entry plus the match it completed, if any.
#[derive(Serialize, Debug, JsonSchema)]
pub struct SwipeOutcomeResponse {
    pub swipe: SwipeResponse,
    #[serde(rename = "match")]
    pub created_match: Option<MatchResponse>,
}
