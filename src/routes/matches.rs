use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::matches::{MatchRequest, MatchResponse, MatchUpdateRequest};
use crate::service::matches::MatchService;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, get, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Matches the caller takes part in, newest first
#[openapi(tag = "Matches")]
#[get("/")]
pub async fn list_matches(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<Vec<MatchResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let matches = MatchService::new(&repo).list_matches(&current_user.id).await?;
    Ok(Json(matches.iter().map(MatchResponse::from).collect()))
}

/// Create a match directly between two users
#[openapi(tag = "Matches")]
#[post("/", data = "<payload>")]
pub async fn create_match(
    pool: &State<PgPool>,
    _current_user: CurrentUser,
    payload: JsonBody<MatchRequest>,
) -> Result<(Status, Json<MatchResponse>), AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let created = MatchService::new(&repo).create_match(&payload.user1_id, &payload.user2_id).await?;
    Ok((Status::Created, Json(MatchResponse::from(&created))))
}

#[openapi(tag = "Matches")]
#[get("/<id>")]
pub async fn get_match(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Json<MatchResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid match id", e))?;
    let found = MatchService::new(&repo).get_match(&uuid, &current_user.id).await?;
    Ok(Json(MatchResponse::from(&found)))
}

/// Update notes and/or the archived flag
#[openapi(tag = "Matches")]
#[put("/<id>", data = "<payload>")]
pub async fn update_match(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    id: &str,
    payload: JsonBody<MatchUpdateRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid match id", e))?;
    let updated = MatchService::new(&repo).update_match(&uuid, &current_user.id, &payload).await?;
    Ok(Json(MatchResponse::from(&updated)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_matches, create_match, get_match, update_match]
}
