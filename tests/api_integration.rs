//! API integration tests
//!
//! Drives the JSON API through `tower::ServiceExt::oneshot` against an
//! in-memory SQLite store: shortening (generated and custom aliases),
//! idempotence, validation, generation probing, resolve and info.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use curtail::api;
use curtail::auth::AdminAuth;
use curtail::shortener::Shortener;
use curtail::storage::{SqliteStorage, Storage};

const BASE_URL: &str = "http://short.test";

async fn test_app() -> (Router, Arc<dyn Storage>) {
    let storage: Arc<dyn Storage> =
        Arc::new(SqliteStorage::new("sqlite::memory:", 1).await.unwrap());
    storage.init().await.unwrap();

    let shortener = Shortener::new(Arc::clone(&storage), BASE_URL.to_string());
    let auth = Arc::new(AdminAuth::new(Some("secret".to_string())));

    let app = Router::new().nest(
        "/api",
        api::create_api_router(shortener, Arc::clone(&storage), auth),
    );
    (app, storage)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_shorten_generates_seven_char_alias() {
    let (app, _storage) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/shorten",
        json!({"url": "https://example.com/long/path"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let short_id = body["shortId"].as_str().unwrap();
    assert_eq!(short_id.len(), 7);
    assert!(short_id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        body["shortUrl"].as_str().unwrap(),
        format!("{}/{}", BASE_URL, short_id)
    );
    assert_eq!(
        body["longUrl"].as_str().unwrap(),
        "https://example.com/long/path"
    );
}

#[tokio::test]
async fn test_shorten_is_idempotent_for_repeated_url() {
    let (app, storage) = test_app().await;

    let (_, first) = post_json(&app, "/api/shorten", json!({"url": "https://example.com/a"})).await;
    let (status, second) =
        post_json(&app, "/api/shorten", json!({"url": "https://example.com/a"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["shortId"], second["shortId"]);
    // The repeated submission reports the existing row, clicks untouched
    assert_eq!(second["clicks"].as_i64(), Some(0));
    assert!(second["createdAt"].as_i64().is_some());

    let link = storage
        .get(first["shortId"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(link.clicks, 0);
}

#[tokio::test]
async fn test_shorten_rejects_invalid_urls() {
    let (app, _storage) = test_app().await;

    for bad in ["example.com", "ftp://example.com/f", "not a url", ""] {
        let (status, body) = post_json(&app, "/api/shorten", json!({"url": bad})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "url: {:?}", bad);
        assert!(body["error"].as_str().unwrap().contains("http"));
    }
}

#[tokio::test]
async fn test_custom_alias_roundtrip() {
    let (app, _storage) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/shorten",
        json!({"url": "https://example.com/custom", "custom": "my-Link_1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shortId"].as_str(), Some("my-Link_1"));

    let (status, resolved) = post_json(&app, "/api/resolve", json!({"short": "my-Link_1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resolved["long_url"].as_str(),
        Some("https://example.com/custom")
    );
    assert_eq!(resolved["clicks"].as_i64(), Some(0));
}

#[tokio::test]
async fn test_custom_alias_conflict_and_idempotence() {
    let (app, _storage) = test_app().await;

    post_json(
        &app,
        "/api/shorten",
        json!({"url": "https://example.com/one", "custom": "claimed"}),
    )
    .await;

    // Same alias, different URL: conflict
    let (status, body) = post_json(
        &app,
        "/api/shorten",
        json!({"url": "https://example.com/two", "custom": "claimed"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().is_some());

    // Same alias, same URL: idempotent success
    let (status, body) = post_json(
        &app,
        "/api/shorten",
        json!({"url": "https://example.com/one", "custom": "claimed"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shortId"].as_str(), Some("claimed"));
}

#[tokio::test]
async fn test_custom_alias_validation() {
    let (app, _storage) = test_app().await;

    let too_long = "a".repeat(65);
    for bad in ["ab", "has space", "api", "API", "Resolve", too_long.as_str()] {
        let (status, _) = post_json(
            &app,
            "/api/shorten",
            json!({"url": "https://example.com/", "custom": bad}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "alias: {:?}", bad);
    }
}

#[tokio::test]
async fn test_empty_custom_alias_means_generated() {
    let (app, _storage) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/shorten",
        json!({"url": "https://example.com/empty-custom", "custom": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shortId"].as_str().unwrap().len(), 7);
}

#[tokio::test]
async fn test_generate_returns_unused_alias() {
    let (app, storage) = test_app().await;

    let (status, body) = get_json(&app, "/api/generate").await;
    assert_eq!(status, StatusCode::OK);

    let short_id = body["shortId"].as_str().unwrap();
    assert_eq!(short_id.len(), 7);
    assert_eq!(
        body["shortUrl"].as_str().unwrap(),
        format!("{}/{}", BASE_URL, short_id)
    );

    // Probing must not create a mapping
    assert!(storage.get(short_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_resolve_accepts_full_short_url() {
    let (app, _storage) = test_app().await;

    let (_, created) = post_json(
        &app,
        "/api/shorten",
        json!({"url": "https://example.com/deep"}),
    )
    .await;
    let short_url = created["shortUrl"].as_str().unwrap();

    let (status, resolved) = post_json(&app, "/api/resolve", json!({"short": short_url})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["long_url"].as_str(), Some("https://example.com/deep"));
}

#[tokio::test]
async fn test_resolve_rejects_empty_input() {
    let (app, _storage) = test_app().await;

    for bad in ["", "/", "http://short.test/"] {
        let (status, _) = post_json(&app, "/api/resolve", json!({"short": bad})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "input: {:?}", bad);
    }
}

#[tokio::test]
async fn test_resolve_unknown_alias_is_404() {
    let (app, _storage) = test_app().await;

    let (status, _) = post_json(&app, "/api/resolve", json!({"short": "missing0"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_info_found_and_not_found() {
    let (app, _storage) = test_app().await;

    let (_, created) = post_json(
        &app,
        "/api/shorten",
        json!({"url": "https://example.com/info"}),
    )
    .await;
    let short_id = created["shortId"].as_str().unwrap();

    let (status, info) = get_json(&app, &format!("/api/info/{}", short_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["short_id"].as_str(), Some(short_id));
    assert_eq!(info["clicks"].as_i64(), Some(0));

    let (status, _) = get_json(&app, "/api/info/unknown0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _storage) = test_app().await;

    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"].as_str(), Some("OK"));
}
