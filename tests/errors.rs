//! Error classification through the full middleware stack.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;
use common::*;

const SESSION_COOKIE: &str = "snippet.sid";

fn with_session(uri: &str, session_id: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("{SESSION_COOKIE}={session_id}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_forbidden_redirects_with_flash() {
    let app = app(test_config());

    let response = app.clone().oneshot(get("/forbidden")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "../");

    let session_id =
        cookie_value(response.headers(), SESSION_COOKIE).expect("flash stored in a new session");

    // The next page shows the flash...
    let page = app.clone().oneshot(with_session("/", &session_id)).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let body = body_string(page).await;
    assert!(body.contains("flash-danger"));
    assert!(body.contains(">nope<"));

    // ...exactly once.
    let page = app.oneshot(with_session("/", &session_id)).await.unwrap();
    assert!(!body_string(page).await.contains("flash-danger"));
}

#[tokio::test]
async fn test_plain_not_found_renders_page_without_flash() {
    let response = app(test_config())
        .oneshot(get("/no/such/page"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(
        cookie_value(response.headers(), SESSION_COOKIE).is_none(),
        "no session should be written for a plain 404"
    );

    let body = body_string(response).await;
    assert!(body.contains("could not be found"));
    assert!(!body.contains("flash-"));
}

#[tokio::test]
async fn test_explained_not_found_redirects_with_flash() {
    let app = app(test_config());

    let response = app.clone().oneshot(get("/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "../");

    let session_id = cookie_value(response.headers(), SESSION_COOKIE).unwrap();
    let page = app.oneshot(with_session("/", &session_id)).await.unwrap();
    assert!(body_string(page).await.contains("Snippet not found"));
}

#[tokio::test]
async fn test_production_500_hides_message() {
    let response = app(production_config()).oneshot(get("/boom")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_string(response).await;
    assert!(body.contains("Something went wrong"));
    assert!(!body.contains("database exploded"));
}

#[tokio::test]
async fn test_production_maps_other_statuses_to_500() {
    let response = app(production_config()).oneshot(get("/teapot")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body_string(response).await.contains("short and stout"));
}

#[tokio::test]
async fn test_development_shows_details() {
    let response = app(test_config()).oneshot(get("/boom")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("database exploded"));

    let response = app(test_config()).oneshot(get("/teapot")).await.unwrap();
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    let body = body_string(response).await;
    assert!(body.contains("Error 418"));
    assert!(body.contains("short and stout"));
}

fn oversized_post(mut config: snippet_web::AppConfig) -> (axum::Router, Request<Body>) {
    config.limits.max_body_bytes = 16;
    let token = "a".repeat(64);
    let request = form_request(
        "POST",
        Some(&format!("XSRF-TOKEN={token}")),
        &format!("_csrf={token}&title=hello"),
    );
    (app(config), request)
}

#[tokio::test]
async fn test_oversized_body_shows_details_in_development() {
    let (app, request) = oversized_post(test_config());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_string(response).await;
    assert!(body.contains("Error 413"));
    assert!(body.contains("request entity too large"));
}

#[tokio::test]
async fn test_oversized_body_renders_500_in_production() {
    let (app, request) = oversized_post(production_config());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("Something went wrong"));
    assert!(!body.contains("too large"));
}
