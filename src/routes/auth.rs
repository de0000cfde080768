use crate::auth::CurrentUser;
use crate::config::Config;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::user::{AuthMessageResponse, LoginRequest, RegisterRequest, normalize_email};
use crate::routes::response::WithToken;
use crate::service::auth::AuthService;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use validator::Validate;

/// Create an account and open a session; the token is returned in the Authorization header
#[openapi(tag = "Auth")]
#[post("/register", data = "<payload>")]
pub async fn register(
    pool: &State<PgPool>,
    config: &State<Config>,
    payload: JsonBody<RegisterRequest>,
) -> Result<WithToken<Json<AuthMessageResponse>>, AppError> {
    let mut request = payload.into_inner();
    request.email = normalize_email(&request.email);
    request.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let (user, issued) = AuthService::new(&repo, &config.session).register(&request.email, &request.password).await?;

    Ok(WithToken::new(Json(AuthMessageResponse::for_user("user registered", user.id)), &issued.token))
}

/// Exchange credentials for a bearer token, returned in the Authorization header
#[openapi(tag = "Auth")]
#[post("/login", data = "<payload>")]
pub async fn login(pool: &State<PgPool>, config: &State<Config>, payload: JsonBody<LoginRequest>) -> Result<WithToken<Json<AuthMessageResponse>>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let email = normalize_email(&payload.email);
    let (user, issued) = AuthService::new(&repo, &config.session).login(&email, &payload.password).await?;

    Ok(WithToken::new(Json(AuthMessageResponse::for_user("logged in", user.id)), &issued.token))
}

/// Revoke the session behind the presented token
#[openapi(tag = "Auth")]
#[get("/logout")]
pub async fn logout(pool: &State<PgPool>, config: &State<Config>, current_user: CurrentUser) -> Result<Json<AuthMessageResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    AuthService::new(&repo, &config.session).logout(&current_user.session_id).await?;
    Ok(Json(AuthMessageResponse::new("logged out")))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![register, login, logout]
}
