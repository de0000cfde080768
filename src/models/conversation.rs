use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;

use crate::models::message::MessageResponse;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub match_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A conversation together with the two participants of its match.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ConversationAccess {
    pub id: Uuid,
    pub match_id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ConversationAccess {
    pub fn has_participant(&self, user_id: &Uuid) -> bool {
        self.user1_id == *user_id || self.user2_id == *user_id
    }

    pub fn other_participant(&self, user_id: &Uuid) -> Uuid {
        if self.user1_id == *user_id { self.user2_id } else { self.user1_id }
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub match_id: Uuid,
    pub other_user_id: Uuid,
    pub other_user_name: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, JsonSchema)]
pub struct ConversationRequest {
    pub match_id: Uuid,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Conversation> for ConversationResponse {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id,
            match_id: conversation.match_id,
            created_at: conversation.created_at,
        }
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ConversationCreatedResponse {
    pub message: String,
    pub conversation: ConversationResponse,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ConversationSummaryResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub other_user_id: Uuid,
    pub other_user_name: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&ConversationSummary> for ConversationSummaryResponse {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            id: summary.id,
            match_id: summary.match_id,
            other_user_id: summary.other_user_id,
            other_user_name: summary.other_user_name.clone(),
            last_message: summary.last_message.clone(),
            last_message_at: summary.last_message_at,
            created_at: summary.created_at,
        }
    }
}

/// Conversation detail with its visible messages, oldest first.
#[derive(Serialize, Debug, JsonSchema)]
pub struct ConversationDetailResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub other_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<MessageResponse>,
}
