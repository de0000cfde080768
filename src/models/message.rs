use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::app_error::AppError;
use crate::models::pagination::PageInfo;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    /// The single definition of a readable message. SQL read paths use
    /// [`crate::database::message::VISIBLE_MESSAGE`] for the same rule.
    pub fn is_visible(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct MessageRequest {
    #[validate(length(max = 5000, message = "message too long"))]
    pub content: String,
}

impl MessageRequest {
    /// Trimmed content, rejecting blank messages.
    pub fn content(&self) -> Result<&str, AppError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(AppError::bad_request("message content required"));
        }
        Ok(content)
    }
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            sender_name: message.sender_name.clone(),
            content: message.content.clone(),
            created_at: message.created_at,
        }
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct MessageEnvelope {
    pub message: String,
    pub data: MessageResponse,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct MessagePage {
    pub messages: Vec<MessageResponse>,
    pub pagination: PageInfo,
}
