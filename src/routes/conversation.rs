use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::conversation::{
    ConversationCreatedResponse, ConversationDetailResponse, ConversationRequest, ConversationResponse, ConversationSummaryResponse,
};
use crate::models::message::{MessageEnvelope, MessagePage, MessageRequest, MessageResponse};
use crate::models::pagination::OffsetParams;
use crate::service::conversation::ConversationService;
use crate::service::message::MessageService;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

fn parse_conversation_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid conversation id", e))
}

/// Conversations of the caller with the other participant and the latest visible message
#[openapi(tag = "Conversations")]
#[get("/")]
pub async fn list_conversations(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<Vec<ConversationSummaryResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let summaries = ConversationService::new(&repo).list_conversations(&current_user.id).await?;
    Ok(Json(summaries.iter().map(ConversationSummaryResponse::from).collect()))
}

/// Open the conversation for a match the caller takes part in
#[openapi(tag = "Conversations")]
#[post("/", data = "<payload>")]
pub async fn create_conversation(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    payload: JsonBody<ConversationRequest>,
) -> Result<(Status, Json<ConversationCreatedResponse>), AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let conversation = ConversationService::new(&repo)
        .create_conversation(&payload.match_id, &current_user.id)
        .await?;

    Ok((
        Status::Created,
        Json(ConversationCreatedResponse {
            message: "conversation created".to_string(),
            conversation: ConversationResponse::from(&conversation),
        }),
    ))
}

/// Conversation detail with its visible messages, oldest first
#[openapi(tag = "Conversations")]
#[get("/<id>")]
pub async fn get_conversation(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Json<ConversationDetailResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = parse_conversation_id(id)?;
    let (access, messages) = ConversationService::new(&repo).get_conversation(&uuid, &current_user.id).await?;

    Ok(Json(ConversationDetailResponse {
        id: access.id,
        match_id: access.match_id,
        other_user_id: access.other_participant(&current_user.id),
        created_at: access.created_at,
        messages: messages.iter().map(MessageResponse::from).collect(),
    }))
}

#[openapi(tag = "Conversations")]
#[delete("/<id>")]
pub async fn delete_conversation(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = parse_conversation_id(id)?;
    ConversationService::new(&repo).delete_conversation(&uuid, &current_user.id).await?;
    Ok(Status::Ok)
}

#[openapi(tag = "Messages")]
#[post("/<id>/messages", data = "<payload>")]
pub async fn send_message(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    id: &str,
    payload: JsonBody<MessageRequest>,
) -> Result<(Status, Json<MessageEnvelope>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = parse_conversation_id(id)?;
    let message = MessageService::new(&repo).send(&uuid, &current_user.id, &payload).await?;

    Ok((
        Status::Created,
        Json(MessageEnvelope {
            message: "message sent".to_string(),
            data: MessageResponse::from(&message),
        }),
    ))
}

/// A page of visible messages, newest first
#[openapi(tag = "Messages")]
#[get("/<id>/messages?<limit>&<offset>")]
pub async fn list_messages(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    id: &str,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Json<MessagePage>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = parse_conversation_id(id)?;
    let (messages, pagination) = MessageService::new(&repo)
        .list(&uuid, &current_user.id, &OffsetParams::new(limit, offset))
        .await?;

    Ok(Json(MessagePage {
        messages: messages.iter().map(MessageResponse::from).collect(),
        pagination,
    }))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_conversations, create_conversation, get_conversation, delete_conversation, send_message, list_messages]
}
