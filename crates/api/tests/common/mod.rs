//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use waypoint_api::auth::jwt::JwtConfig;
use waypoint_api::config::ServerConfig;
use waypoint_api::router::build_app_router;
use waypoint_api::state::AppState;
use waypoint_core::clock::FixedClock;
use waypoint_core::types::Timestamp;

/// The instant every test app is frozen at: Monday 2024-06-03 12:00 UTC.
pub fn test_now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        dashboard_page_size: 5,
        jwt: JwtConfig {
            secret: "waypoint-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the application router, with the production middleware stack,
/// over `pool` and a clock frozen at [`test_now`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_at(pool, test_now())
}

pub fn build_test_app_at(pool: PgPool, now: Timestamp) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        clock: Arc::new(FixedClock(now)),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST without a body, for action endpoints like `/advance`.
pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register `username` and return `(access_token, user_id)`.
pub async fn register(app: &Router, username: &str) -> (String, i64) {
    register_in(app, username, "UTC").await
}

/// Register `username` in the IANA zone `timezone`.
pub async fn register_in(app: &Router, username: &str, timezone: &str) -> (String, i64) {
    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "username": username, "password": "password123", "timezone": timezone }),
    )
    .await;
    assert_eq!(response.status(), 201, "registering {username} failed");
    let json = body_json(response).await;
    let token = json["data"]["access_token"].as_str().unwrap().to_string();
    let id = json["data"]["user"]["id"].as_i64().unwrap();
    (token, id)
}

/// Create a goal and return its JSON view (`data.goal`).
pub async fn create_goal(app: &Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app, "/api/v1/goals", token, body).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["goal"].clone()
}
