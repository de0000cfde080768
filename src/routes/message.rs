use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::message::{MessageEnvelope, MessageRequest, MessageResponse};
use crate::service::message::MessageService;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, put};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Edit one of the caller's own messages
#[openapi(tag = "Messages")]
#[put("/<id>", data = "<payload>")]
pub async fn edit_message(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    id: &str,
    payload: JsonBody<MessageRequest>,
) -> Result<Json<MessageEnvelope>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid message id", e))?;
    let message = MessageService::new(&repo).edit(&uuid, &current_user.id, &payload).await?;

    Ok(Json(MessageEnvelope {
        message: "message updated".to_string(),
        data: MessageResponse::from(&message),
    }))
}

/// Soft-delete one of the caller's own messages
#[openapi(tag = "Messages")]
#[delete("/<id>")]
pub async fn delete_message(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid message id", e))?;
    MessageService::new(&repo).soft_delete(&uuid, &current_user.id).await?;
    Ok(Status::Ok)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![edit_message, delete_message]
}
