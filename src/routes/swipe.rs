use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::matches::MatchResponse;
use crate::models::swipe::{SwipeFilter, SwipeOutcomeResponse, SwipeRequest, SwipeResponse};
use crate::service::swipe::SwipeService;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Record a swipe; a Right swipe that completes a reciprocal pair returns the new match
#[openapi(tag = "Swipes")]
#[post("/", data = "<payload>")]
pub async fn create_swipe(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    payload: JsonBody<SwipeRequest>,
) -> Result<(Status, Json<SwipeOutcomeResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let outcome = SwipeService::new(&repo)
        .record_swipe(&current_user.id, &payload.swipee_id, &payload.direction)
        .await?;

    Ok((
        Status::Created,
        Json(SwipeOutcomeResponse {
            swipe: SwipeResponse::from(&outcome.swipe),
            created_match: outcome.created_match.as_ref().map(MatchResponse::from),
        }),
    ))
}

/// List swipes, optionally filtered by swiper and/or swipee
#[openapi(tag = "Swipes")]
#[get("/?<swiper_id>&<swipee_id>")]
pub async fn list_swipes(
    pool: &State<PgPool>,
    _current_user: CurrentUser,
    swiper_id: Option<String>,
    swipee_id: Option<String>,
) -> Result<Json<Vec<SwipeResponse>>, AppError> {
    let filter = SwipeFilter {
        swiper_id: swiper_id.as_deref().map(Uuid::parse_str).transpose()?,
        swipee_id: swipee_id.as_deref().map(Uuid::parse_str).transpose()?,
    };

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let swipes = SwipeService::new(&repo).list_swipes(&filter).await?;
    Ok(Json(swipes.iter().map(SwipeResponse::from).collect()))
}

#[openapi(tag = "Swipes")]
#[get("/<id>")]
pub async fn get_swipe(pool: &State<PgPool>, _current_user: CurrentUser, id: &str) -> Result<Json<SwipeResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid swipe id", e))?;
    let swipe = SwipeService::new(&repo).get_swipe(&uuid).await?;
    Ok(Json(SwipeResponse::from(&swipe)))
}

/// Delete one of the caller's own swipes
#[openapi(tag = "Swipes")]
#[delete("/<id>")]
pub async fn delete_swipe(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid swipe id", e))?;
    SwipeService::new(&repo).delete_swipe(&uuid, &current_user.id).await?;
    Ok(Status::Ok)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_swipe, list_swipes, get_swipe, delete_swipe]
}
