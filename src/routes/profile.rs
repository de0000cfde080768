use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::profile::{ProfileRequest, ProfileResponse};
use crate::service::profile::ProfileService;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

fn parse_profile_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid profile id", e))
}

/// With `user_id`, only that user's profile; otherwise everyone except the caller
#[openapi(tag = "Profiles")]
#[get("/?<user_id>")]
pub async fn list_profiles(pool: &State<PgPool>, current_user: CurrentUser, user_id: Option<String>) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let only_user = user_id.as_deref().map(Uuid::parse_str).transpose()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let profiles = ProfileService::new(&repo).list(only_user.as_ref(), &current_user.id).await?;
    Ok(Json(profiles.iter().map(ProfileResponse::from).collect()))
}

#[openapi(tag = "Profiles")]
#[get("/me")]
pub async fn get_my_profile(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<ProfileResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let profile = ProfileService::new(&repo).get_for_user(&current_user.id).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

#[openapi(tag = "Profiles")]
#[get("/<id>")]
pub async fn get_profile(pool: &State<PgPool>, _current_user: CurrentUser, id: &str) -> Result<Json<ProfileResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = parse_profile_id(id)?;
    let profile = ProfileService::new(&repo).get(&uuid).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

#[openapi(tag = "Profiles")]
#[post("/", data = "<payload>")]
pub async fn create_profile(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    payload: JsonBody<ProfileRequest>,
) -> Result<(Status, Json<ProfileResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let profile = ProfileService::new(&repo).create(&current_user.id, &payload).await?;
    Ok((Status::Created, Json(ProfileResponse::from(&profile))))
}

#[openapi(tag = "Profiles")]
#[put("/<id>", data = "<payload>")]
pub async fn update_profile(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    id: &str,
    payload: JsonBody<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = parse_profile_id(id)?;
    let profile = ProfileService::new(&repo).update(&uuid, &current_user.id, &payload).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

#[openapi(tag = "Profiles")]
#[delete("/<id>")]
pub async fn delete_profile(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = parse_profile_id(id)?;
    ProfileService::new(&repo).delete(&uuid, &current_user.id).await?;
    Ok(Status::Ok)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_profiles, get_my_profile, get_profile, create_profile, update_profile, delete_profile]
}
