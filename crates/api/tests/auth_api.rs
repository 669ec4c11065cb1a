//! HTTP-level integration tests for sign-up, login, refresh, logout and `me`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, get_auth, login, post_auth, post_json, post_json_with_headers,
    TEST_PASSWORD,
};
use foodshare_db::repositories::UserRepo;
use sqlx::PgPool;

fn signup_body(email: &str, user_type: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "password": "s3cret-pass",
        "confirm_password": "s3cret-pass",
        "full_name": "Pat Pantry",
        "user_type": user_type,
    })
}

// ---------------------------------------------------------------------------
// Sign-up
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_creates_account_and_session(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/signup",
        signup_body("Pat@Example.COM", "recipient"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], "pat@example.com");
    assert_eq!(json["user"]["user_type"], "recipient");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_defaults_to_donor(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = signup_body("d@example.com", "donor");
    body.as_object_mut().unwrap().remove("user_type");

    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["user"]["user_type"], "donor");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_duplicate_email_is_conflict(pool: PgPool) {
    create_user(&pool, "taken@example.com", "donor").await;
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/signup", signup_body("TAKEN@example.com", "donor")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_password_mismatch_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let mut body = signup_body("m@example.com", "donor");
    body["confirm_password"] = serde_json::json!("different-pass");

    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Passwords don't match");

    assert!(UserRepo::find_by_email(&pool, "m@example.com").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success_records_login(pool: PgPool) {
    let user = create_user(&pool, "login@example.com", "donor").await;
    let app = common::build_test_app(pool.clone());

    let json = login(app, "Login@Example.com").await;
    assert_eq!(json["user"]["id"], user.id);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_user(&pool, "wrong@example.com", "donor").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "wrong@example.com", "password": "nope-nope" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = create_user(&pool, "gone@example.com", "donor").await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "gone@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_inactive_user_wrong_password_is_unauthorized(pool: PgPool) {
    let user = create_user(&pool, "gone@example.com", "donor").await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    // Account state is not revealed without the right password.
    let body = serde_json::json!({ "email": "gone@example.com", "password": "nope-nope" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_records_user_agent(pool: PgPool) {
    let user = create_user(&pool, "ua@example.com", "donor").await;
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "email": "ua@example.com", "password": TEST_PASSWORD });
    let response = post_json_with_headers(
        app.clone(),
        "/api/v1/auth/login",
        body,
        &[("user-agent", "pantry-app/2.1 (Android)")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // A request without the header stores no agent.
    login(app, "ua@example.com").await;

    let agents: Vec<Option<String>> = sqlx::query_scalar(
        "SELECT user_agent FROM user_sessions WHERE user_id = $1 ORDER BY id",
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(agents, vec![Some("pantry-app/2.1 (Android)".to_string()), None]);
}

// ---------------------------------------------------------------------------
// Refresh / logout / me
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    create_user(&pool, "r@example.com", "donor").await;
    let app = common::build_test_app(pool);

    let first = login(app.clone(), "r@example.com").await;
    let old_refresh = first["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"], old_refresh.as_str());

    // The old token was revoked by the rotation.
    let replay = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_refresh_rotates_once(pool: PgPool) {
    let user = create_user(&pool, "race@example.com", "donor").await;
    let app = common::build_test_app(pool.clone());

    let json = login(app.clone(), "race@example.com").await;
    let body = serde_json::json!({ "refresh_token": json["refresh_token"] });

    let (a, b) = tokio::join!(
        post_json(app.clone(), "/api/v1/auth/refresh", body.clone()),
        post_json(app, "/api/v1/auth/refresh", body),
    );
    let mut statuses = vec![a.status(), b.status()];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::UNAUTHORIZED]);

    // Login session revoked, one rotated session issued.
    let live: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_sessions WHERE user_id = $1 AND is_revoked = false",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(live, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    create_user(&pool, "out@example.com", "donor").await;
    let app = common::build_test_app(pool);

    let json = login(app.clone(), "out@example.com").await;
    let access = json["access_token"].as_str().unwrap();
    let refresh = json["refresh_token"].as_str().unwrap();

    let response = post_auth(app.clone(), "/api/v1/auth/logout", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_requires_token(pool: PgPool) {
    let user = create_user(&pool, "me@example.com", "recipient").await;
    let app = common::build_test_app(pool);

    let unauthenticated = common::get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

    let garbage = get_auth(app.clone(), "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    let json = login(app.clone(), "me@example.com").await;
    let response = get_auth(app, "/api/v1/auth/me", json["access_token"].as_str().unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["id"], user.id);
    assert_eq!(me["user_type"], "recipient");
}
