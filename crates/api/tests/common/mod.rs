#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use novaai_api::config::{ServerConfig, SessionConfig};
use novaai_api::router::build_app_router;
use novaai_api::state::AppState;
use novaai_db::DbPool;
use novaai_events::{EventBus, EventPersistence};
use novaai_tutor::{Tutor, TutorConfig};

pub const TEST_PASSWORD: &str = "learning-is-fun";

/// A fresh in-memory database with all migrations (and the seed catalog)
/// applied.
pub async fn test_pool() -> DbPool {
    let pool = novaai_db::create_memory_pool()
        .await
        .expect("in-memory pool should open");
    novaai_db::run_migrations(&pool)
        .await
        .expect("migrations should apply");
    pool
}

/// Test `ServerConfig` with safe defaults and an offline tutor.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: "sqlite::memory:".to_string(),
        password_min_length: 8,
        session: SessionConfig {
            ttl_hours: 24,
            sweep_interval_secs: 3600,
        },
        tutor: TutorConfig::offline(),
    }
}

/// Build the application exactly as `main.rs` does, with event persistence
/// running in the background.
pub fn build_test_app(pool: DbPool) -> Router {
    build_test_app_with_tutor(pool, Tutor::offline())
}

pub fn build_test_app_with_tutor(pool: DbPool, tutor: Tutor) -> Router {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    tokio::spawn(EventPersistence::run(pool.clone(), event_bus.subscribe()));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        tutor,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register `username` through the API and return its session token.
pub async fn register(app: Router, username: &str) -> String {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@novaai.test"),
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["sessionId"].as_str().unwrap().to_string()
}

/// Register a user, promote them to `instructor`, and return their token.
pub async fn register_instructor(app: Router, pool: &DbPool, username: &str) -> String {
    let token = register(app, username).await;
    let user = novaai_db::repositories::UserRepo::find_by_username(pool, username)
        .await
        .unwrap()
        .unwrap();
    novaai_db::repositories::UserRepo::set_role(pool, user.id, novaai_core::roles::ROLE_INSTRUCTOR)
        .await
        .unwrap();
    token
}
