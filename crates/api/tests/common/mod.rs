#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tower::ServiceExt;

use foodshare_api::auth::jwt::JwtConfig;
use foodshare_api::auth::password::hash_password;
use foodshare_api::config::ServerConfig;
use foodshare_api::router::build_app_router;
use foodshare_api::state::AppState;
use foodshare_db::models::user::{CreateUser, User};
use foodshare_db::repositories::UserRepo;
use foodshare_events::{DomainEvent, EventBus};

pub const TEST_PASSWORD: &str = "correct horse battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and no default search radius.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        default_search_radius_miles: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router over `pool`, using the same
/// middleware stack as the binary.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_events(pool).0
}

/// Like [`build_test_app`], also returning a subscriber on the event bus.
pub fn build_test_app_with_events(pool: PgPool) -> (Router, broadcast::Receiver<DomainEvent>) {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let events = event_bus.subscribe();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
    };

    (build_app_router(state, &config), events)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

/// POST a JSON body with extra request headers.
pub async fn post_json_with_headers(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut request = json_request(Method::POST, uri, None, body);
    for (name, value) in headers {
        request.headers_mut().insert(
            axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
            axum::http::HeaderValue::from_str(value).unwrap(),
        );
    }
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Insert a user directly, with [`TEST_PASSWORD`] as the password.
pub async fn create_user(pool: &PgPool, email: &str, user_type: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        full_name: format!("Test {user_type}"),
        user_type: user_type.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the full auth response.
pub async fn login(app: Router, email: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// Create a user and return `(user, access_token)`.
pub async fn user_with_token(pool: &PgPool, app: Router, email: &str, user_type: &str) -> (User, String) {
    let user = create_user(pool, email, user_type).await;
    let json = login(app, email).await;
    let token = json["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string();
    (user, token)
}
