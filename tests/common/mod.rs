//! Shared utilities for integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Response, StatusCode},
    routing::{self, post},
    Router,
};
use snippet_web::config::{AppConfig, Environment};
use snippet_web::http::{routes, AppState};
use snippet_web::{AppError, HttpServer};

pub const FORM: &str = "application/x-www-form-urlencoded";

/// Development config with a port set.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = Some(0);
    config
}

pub fn production_config() -> AppConfig {
    let mut config = test_config();
    config.server.environment = Environment::Production;
    config
}

/// Application routes plus a few that fail on purpose or accept writes.
pub fn test_routes() -> Router<AppState> {
    routes::routes()
        .route("/forbidden", routing::get(|| async { AppError::forbidden("nope") }))
        .route(
            "/missing",
            routing::get(|| async { AppError::NotFound("Snippet not found".into()) }),
        )
        .route(
            "/boom",
            routing::get(|| async { AppError::internal("database exploded") }),
        )
        .route(
            "/teapot",
            routing::get(|| async { AppError::from_status(StatusCode::IM_A_TEAPOT, "short and stout") }),
        )
        .route(
            "/submit",
            post(echo).put(echo).delete(echo).get(|| async { "read" }),
        )
}

async fn echo(body: String) -> String {
    format!("accepted:{body}")
}

/// Fully layered router for `oneshot` tests.
pub fn app(config: AppConfig) -> Router {
    HttpServer::with_routes(config, test_routes())
        .expect("server builds")
        .router()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Every `Set-Cookie` header on a response.
pub fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect()
}

/// The full `Set-Cookie` line for the named cookie.
pub fn set_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    set_cookies(headers)
        .into_iter()
        .find(|cookie| cookie.starts_with(&format!("{name}=")))
}

/// Just the value of the named cookie.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    set_cookie(headers, name).map(|cookie| {
        let pair = cookie.split(';').next().unwrap_or_default();
        pair[name.len() + 1..].to_string()
    })
}

/// A mutating form request carrying the given cookie and body.
pub fn form_request(method: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri("/submit")
        .header(header::CONTENT_TYPE, FORM);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
