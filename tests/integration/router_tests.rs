//! Router tests for request validation.
//!
//! The pool is created lazily and never connected: every request here must be
//! answered before any store access.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use shelfmark_server::{
    config::AppConfig,
    create_router,
    repository::Repository,
    services::{aggregate_cache::AggregateCache, Services},
    AppState,
};

const BAD_VALUE: u64 = 18;

fn app() -> Router {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(100))
        .connect_lazy(&config.database.url)
        .expect("valid database url");
    let services = Services::new(Repository::new(pool), Arc::new(AggregateCache::new()), &config)
        .expect("services");

    create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn assert_bad_value(method: Method, uri: &str, body: Option<Value>) {
    let (status, body) = send(method, uri, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}: {}", uri, body);
    assert_eq!(body["code"], BAD_VALUE);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_book_search_needs_a_criterion() {
    assert_bad_value(Method::GET, "/api/books", None).await;
    assert_bad_value(Method::GET, "/api/books?title=&author=&genre=", None).await;
    assert_bad_value(Method::GET, "/api/books?last_book_id=abc", None).await;
}

#[tokio::test]
async fn test_book_search_rejects_bad_genre() {
    assert_bad_value(Method::GET, "/api/books?genre=10", None).await;
    assert_bad_value(Method::GET, "/api/books?genre=-1", None).await;
    assert_bad_value(Method::GET, "/api/books?genre=arts", None).await;
}

#[tokio::test]
async fn test_empty_genre_is_answered_from_cache() {
    let (status, body) = send(Method::GET, "/api/books?genre=5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no books found");
}

#[tokio::test]
async fn test_book_registration_validation() {
    assert_bad_value(Method::POST, "/api/books", Some(json!([]))).await;
    assert_bad_value(
        Method::POST,
        "/api/books",
        Some(json!([{ "title": "", "author": "Sato", "genre": 1 }])),
    )
    .await;
    assert_bad_value(
        Method::POST,
        "/api/books",
        Some(json!([
            { "title": "Kokoro", "author": "Natsume", "genre": 8 },
            { "title": "Tides", "author": "Ito", "genre": 12 }
        ])),
    )
    .await;
}

#[tokio::test]
async fn test_body_must_be_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/members")
        .body(Body::from("name=Hanako"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_validation() {
    assert_bad_value(
        Method::POST,
        "/api/members",
        Some(json!({ "name": "Hanako", "address": "", "phone_number": "090" })),
    )
    .await;
    assert_bad_value(Method::PATCH, "/api/members/abc", Some(json!({}))).await;
    assert_bad_value(Method::PATCH, "/api/members/abc", Some(json!({ "name": "" }))).await;
    assert_bad_value(Method::GET, "/api/members?order=age", None).await;
    assert_bad_value(Method::GET, "/api/members/abc?encrypted=yes", None).await;
    assert_bad_value(Method::GET, "/api/members/!!!?encrypted=true", None).await;
}

#[tokio::test]
async fn test_lending_batch_validation() {
    assert_bad_value(
        Method::POST,
        "/api/lendings",
        Some(json!({ "member_id": "m1", "book_ids": ["b1", "b2", "b1"] })),
    )
    .await;
    assert_bad_value(
        Method::POST,
        "/api/lendings",
        Some(json!({ "member_id": "", "book_ids": ["b1"] })),
    )
    .await;
    assert_bad_value(
        Method::POST,
        "/api/lendings/return",
        Some(json!({ "member_id": "m1", "book_ids": [] })),
    )
    .await;
    assert_bad_value(Method::GET, "/api/lendings?over_due=maybe", None).await;
}
