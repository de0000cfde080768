mod auth;
mod config;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use rocket::figment::Figment;
use rocket::{Build, Catcher, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};
use rocket_okapi::{get_openapi_route, okapi::merge::marge_spec_list};
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence over the configured level, e.g.
    //   RUST_LOG=info,kindred::service=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    // a subscriber may already be installed when several rockets share a process
    let _ = if json_format { subscriber.json().try_init() } else { subscriber.try_init() };
}

fn check_session_secret(session: &config::SessionConfig, release: bool) -> Result<(), String> {
    if session.jwt_secret.trim().is_empty() {
        return Err("session.jwt_secret must not be empty".to_string());
    }
    if release && session.jwt_secret == config::DEV_JWT_SECRET {
        return Err("session.jwt_secret is still the development default. Set KINDRED_SESSION__JWT_SECRET, e.g. from: openssl rand -base64 32".to_string());
    }
    Ok(())
}

fn ensure_session_secret(session: &config::SessionConfig) {
    if let Err(problem) = check_session_secret(session, !cfg!(debug_assertions)) {
        panic!("{}", problem);
    }
}

fn build_cors(cors_config: &config::CorsConfig) -> CorsOptions {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        panic!(
            "Invalid CORS configuration: Cannot use wildcard origins (*) with credentials enabled. \
            Either set specific origins or disable credentials."
        );
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete, Method::Options, Method::Head]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Authorization", "Accept"]),
        // clients read the issued token from the login/register response
        expose_headers: ["Authorization", "X-Request-Id"].iter().map(|h| h.to_string()).collect(),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    }
}

fn get_swagger_config(openapi_url: &str) -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: openapi_url.to_string(),
        ..Default::default()
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

fn join_base_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", base, suffix)
    }
}

fn collect_base_paths(api_config: &config::ApiConfig) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    let mut push_unique = |path: String| {
        if !normalized.contains(&path) {
            normalized.push(path);
        }
    };

    push_unique(normalize_base_path(&api_config.base_path));

    for extra in &api_config.additional_base_paths {
        push_unique(normalize_base_path(extra));
    }

    normalized
}

struct RouteSpec {
    path: &'static str,
    routes: Vec<rocket::Route>,
    openapi: rocket_okapi::okapi::openapi3::OpenApi,
}

impl RouteSpec {
    fn new(path: &'static str, (routes, openapi): (Vec<rocket::Route>, rocket_okapi::okapi::openapi3::OpenApi)) -> Self {
        RouteSpec { path, routes, openapi }
    }
}

fn collect_route_specs() -> Vec<RouteSpec> {
    vec![
        RouteSpec::new("/auth", app_routes::auth::routes()),
        RouteSpec::new("/health", app_routes::health::routes()),
        RouteSpec::new("/profiles", app_routes::profile::routes()),
        RouteSpec::new("/swipes", app_routes::swipe::routes()),
        RouteSpec::new("/matches", app_routes::matches::routes()),
        RouteSpec::new("/conversations", app_routes::conversation::routes()),
        RouteSpec::new("/messages", app_routes::message::routes()),
    ]
}

fn api_catchers() -> Vec<Catcher> {
    catchers![
        app_routes::error::bad_request,
        app_routes::error::unauthorized,
        app_routes::error::forbidden,
        app_routes::error::not_found,
        app_routes::error::conflict,
        app_routes::error::unprocessable_entity,
        app_routes::error::internal_error,
    ]
}

fn mount_api_routes(mut rocket: Rocket<Build>, base_path: &str, enable_swagger: bool) -> Rocket<Build> {
    let route_specs = collect_route_specs();

    if enable_swagger {
        let mut openapi_list = Vec::new();
        for spec in route_specs {
            rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
            openapi_list.push((spec.path, spec.openapi));
        }

        let openapi_docs = match marge_spec_list(&openapi_list) {
            Ok(docs) => docs,
            Err(err) => panic!("Could not merge OpenAPI spec: {}", err),
        };

        let settings = rocket_okapi::settings::OpenApiSettings::default();
        rocket = rocket.mount(base_path, vec![get_openapi_route(openapi_docs, &settings)]);

        let docs_path = join_base_path(base_path, "docs");
        let openapi_url = join_base_path(base_path, "openapi.json");
        rocket = rocket.mount(docs_path, make_swagger_ui(&get_swagger_config(&openapi_url)));
    } else {
        for spec in route_specs {
            rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
        }
    }

    rocket.register(base_path, api_catchers())
}

fn rocket_figment(server: &config::ServerConfig) -> Figment {
    rocket::Config::figment()
        .merge(("address", server.address.clone()))
        .merge(("port", server.port))
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    init_tracing(&config.logging.level, config.logging.json_format);
    ensure_session_secret(&config.session);

    let cors = match build_cors(&config.cors).to_cors() {
        Ok(cors) => cors,
        Err(err) => panic!("Failed to create CORS fairing: {}", err),
    };

    let base_paths = collect_base_paths(&config.api);
    let enable_swagger = config.api.enable_swagger;

    let mut rocket = rocket::custom(rocket_figment(&config.server))
        .attach(cors)
        .attach(RequestLogger)
        .attach(stage_db(config.database.clone()))
        .manage(config);

    for base_path in &base_paths {
        rocket = mount_api_routes(rocket, base_path, enable_swagger);
    }

    rocket
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::lazy_config;
    use rocket::http::{Header, Status};
    use rocket::local::asynchronous::Client;

    #[test]
    fn base_paths_are_normalized_and_deduplicated() {
        let api = config::ApiConfig {
            base_path: "api/".to_string(),
            additional_base_paths: vec!["/api".to_string(), " /api/v1/ ".to_string()],
            enable_swagger: false,
        };
        assert_eq!(collect_base_paths(&api), vec!["/api".to_string(), "/api/v1".to_string()]);
        assert_eq!(normalize_base_path("  "), config::DEFAULT_API_BASE_PATH);
        assert_eq!(join_base_path("/api/", "/docs"), "/api/docs");
    }

    #[test]
    fn development_secret_is_refused_in_release() {
        let session = config::SessionConfig::default();
        assert!(check_session_secret(&session, false).is_ok());
        assert!(check_session_secret(&session, true).is_err());

        let blank = config::SessionConfig {
            jwt_secret: " ".to_string(),
            ..config::SessionConfig::default()
        };
        assert!(check_session_secret(&blank, false).is_err());
    }

    #[test]
    #[should_panic(expected = "wildcard origins")]
    fn wildcard_origins_with_credentials_are_rejected() {
        build_cors(&config::CorsConfig {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: true,
        });
    }

    #[rocket::async_test]
    async fn every_session_route_rejects_anonymous_callers() {
        let client = Client::tracked(build_rocket(lazy_config())).await.expect("valid rocket instance");
        let id = "6f1c2a53-3f0e-4a43-9d6c-3b4f0b3c1f11";

        let requests = [
            client.get("/api/auth/logout"),
            client.get("/api/profiles"),
            client.get("/api/profiles/me"),
            client.get(format!("/api/profiles/{id}")),
            client.delete(format!("/api/profiles/{id}")),
            client.get("/api/swipes?swiper_id=".to_string() + id),
            client.get(format!("/api/swipes/{id}")),
            client.delete(format!("/api/swipes/{id}")),
            client.get("/api/matches"),
            client.get(format!("/api/matches/{id}")),
            client.get("/api/conversations"),
            client.get(format!("/api/conversations/{id}")),
            client.delete(format!("/api/conversations/{id}")),
            client.get(format!("/api/conversations/{id}/messages")),
            client.delete(format!("/api/messages/{id}")),
        ];

        for request in requests {
            let uri = request.inner().uri().to_string();
            let response = request.dispatch().await;
            assert_eq!(response.status(), Status::Unauthorized, "{uri}");
            assert_eq!(
                response.into_string().await.as_deref(),
                Some(r#"{"message":"Invalid or expired token"}"#),
                "{uri}"
            );
        }
    }

    #[rocket::async_test]
    async fn tampered_tokens_are_rejected() {
        let client = Client::tracked(build_rocket(lazy_config())).await.expect("valid rocket instance");

        for value in ["Bearer not-a-jwt", "Basic dXNlcjpwdw==", "Bearer "] {
            let response = client.get("/api/matches").header(Header::new("Authorization", value)).dispatch().await;
            assert_eq!(response.status(), Status::Unauthorized, "{value}");
        }
    }

    #[rocket::async_test]
    async fn routes_are_served_under_every_base_path() {
        let mut config = lazy_config();
        config.api.additional_base_paths = vec!["/v1".to_string()];
        let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");

        assert_eq!(client.get("/api/health").dispatch().await.status(), Status::Ok);
        assert_eq!(client.get("/v1/health").dispatch().await.status(), Status::Ok);
        assert_eq!(client.get("/v1/matches").dispatch().await.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn openapi_document_lists_the_api() {
        let client = Client::tracked(build_rocket(lazy_config())).await.expect("valid rocket instance");

        let response = client.get("/api/openapi.json").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = response.into_string().await.unwrap_or_default();
        assert!(body.contains("/conversations/{id}/messages"));
        assert!(body.contains("bearerAuth"));
    }

    #[rocket::async_test]
    async fn unknown_paths_get_a_json_404() {
        let client = Client::tracked(build_rocket(lazy_config())).await.expect("valid rocket instance");

        let response = client.get("/api/nope").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(response.into_string().await.as_deref(), Some(r#"{"message":"Not found"}"#));
    }
}
