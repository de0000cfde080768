use crate::config::Config;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::{AppError, AuthError};
use crate::service::session::SessionService;
use rocket::http::{Method, Status};
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{Object, Responses, SecurityRequirement, SecurityScheme, SecuritySchemeData};
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Method and path suffix of every route reachable without a bearer token.
pub const PUBLIC_ROUTES: &[(Method, &str)] = &[(Method::Post, "/auth/register"), (Method::Post, "/auth/login"), (Method::Get, "/health")];

pub fn is_public_route(method: Method, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    PUBLIC_ROUTES.iter().any(|(m, route)| *m == method && path.ends_with(route))
}

/// The authenticated caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub session_id: Uuid,
}

pub(crate) fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

fn reject(req: &Request<'_>, reason: AuthError) -> RequestOutcome<CurrentUser, AppError> {
    warn!(reason = %reason, method = %req.method(), uri = %req.uri(), "authentication failed");
    Outcome::Error((Status::Unauthorized, AppError::Auth(reason)))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let Some(token) = req.headers().get_one("Authorization").and_then(parse_bearer) else {
            return reject(req, AuthError::Missing);
        };

        let (Some(pool), Some(config)) = (req.rocket().state::<PgPool>(), req.rocket().state::<Config>()) else {
            let err = AppError::from(figment::Error::from("session state is not managed".to_string()));
            return Outcome::Error((Status::InternalServerError, err));
        };

        let repo = PostgresRepository { pool: pool.clone() };
        match SessionService::new(&repo, &config.session).verify(token).await {
            Ok(context) => {
                let current_user = CurrentUser {
                    id: context.user_id,
                    session_id: context.session_id,
                };
                req.local_cache(|| Some(current_user.clone()));
                Outcome::Success(current_user)
            }
            Err(AppError::Auth(reason)) => reject(req, reason),
            Err(err) => Outcome::Error((Status::from(&err), err)),
        }
    }
}

impl<'a> OpenApiFromRequest<'a> for CurrentUser {
    fn from_request_input(_gen: &mut OpenApiGenerator, _name: String, _required: bool) -> rocket_okapi::Result<RequestHeaderInput> {
        let security_scheme = SecurityScheme {
            description: Some("Bearer token returned in the Authorization header by POST /auth/login or /auth/register.".to_string()),
            data: SecuritySchemeData::Http {
                scheme: "bearer".to_string(),
                bearer_format: Some("JWT".to_string()),
            },
            extensions: Object::default(),
        };

        let mut security_req = SecurityRequirement::new();
        security_req.insert("bearerAuth".to_string(), Vec::new());

        Ok(RequestHeaderInput::Security("bearerAuth".to_string(), security_scheme, security_req))
    }

    fn get_responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response};
        let mut responses = Responses::default();
        responses.responses.insert(
            "401".to_string(),
            RefOr::Object(Response {
                description: "Unauthorized - missing, invalid, expired or revoked token".to_string(),
                ..Default::default()
            }),
        );
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bearer_extracts_token() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer   abc "), Some("abc"));
    }

    #[test]
    fn parse_bearer_rejects_other_schemes_and_blanks() {
        assert!(parse_bearer("Basic dXNlcjpwYXNz").is_none());
        assert!(parse_bearer("Bearer").is_none());
        assert!(parse_bearer("Bearer    ").is_none());
        assert!(parse_bearer("abc.def.ghi").is_none());
    }

    #[test]
    fn public_routes_match_under_any_base_path() {
        assert!(is_public_route(Method::Post, "/api/auth/login"));
        assert!(is_public_route(Method::Post, "/api/v1/auth/register"));
        assert!(is_public_route(Method::Get, "/api/health/"));
        assert!(!is_public_route(Method::Get, "/api/auth/logout"));
        assert!(!is_public_route(Method::Post, "/api/swipes"));
    }

    #[test]
    fn public_routes_require_the_listed_method() {
        assert!(!is_public_route(Method::Get, "/api/auth/login"));
        assert!(!is_public_route(Method::Get, "/api/auth/register"));
        assert!(!is_public_route(Method::Post, "/api/health"));
        assert!(!is_public_route(Method::Delete, "/api/auth/login"));
    }
}
