use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::core::time::primitive_now_utc;
use crate::db::types::Theme;
use crate::repositories;
use crate::test_support::{self, call};

#[tokio::test]
async fn new_session_starts_anonymous_with_light_theme() {
    let ctx = test_support::setup_test_context().await;

    let (status, body) = call(&ctx.app, Method::POST, "/api/v1/auth/session", None, None).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["theme"], "light");
    assert!(body["user"].is_null());

    let token = body["access_token"].as_str().expect("token").to_string();
    let (status, body) =
        call(&ctx.app, Method::GET, "/api/v1/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);

    let (status, _) = call(&ctx.app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn seeded_admin_can_log_in() {
    let ctx = test_support::setup_test_context().await;
    let token = test_support::admin_token(&ctx.app).await;

    let (status, body) = call(&ctx.app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["full_name"], "Адміністратор");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let ctx = test_support::setup_test_context().await;

    let (wrong_status, wrong_body) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "not-admin" })),
    )
    .await;
    let (unknown_status, unknown_body) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "ghost", "password": "not-admin" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["detail"], "Invalid username or password");
}

#[tokio::test]
async fn logout_clears_identity_and_keeps_theme() {
    let ctx = test_support::setup_test_context().await;
    let token = test_support::admin_token(&ctx.app).await;

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/session/theme/toggle",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], "dark");
    assert_eq!(body["authenticated"], true);

    let (status, body) =
        call(&ctx.app, Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["theme"], "dark");
    assert!(body["user"].is_null());

    let (status, _) = call(&ctx.app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&ctx.app, Method::GET, "/api/v1/retakes/status", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn theme_preference_carries_into_login() {
    let ctx = test_support::setup_test_context().await;

    let (_, body) = call(&ctx.app, Method::POST, "/api/v1/auth/session", None, None).await;
    let anonymous = body["access_token"].as_str().expect("token").to_string();

    let (status, body) = call(
        &ctx.app,
        Method::PUT,
        "/api/v1/auth/session/theme",
        Some(&anonymous),
        Some(json!({ "theme": "dark" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], "dark");

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        Some(&anonymous),
        Some(json!({ "username": "admin", "password": test_support::ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["theme"], "dark");
    assert_eq!(body["user"]["role"], "admin");
    assert_ne!(body["access_token"], anonymous);

    let (status, _) =
        call(&ctx.app, Method::GET, "/api/v1/auth/session", Some(&anonymous), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_creates_students_only_once() {
    let ctx = test_support::setup_test_context().await;
    let payload = json!({
        "username": "anna.a",
        "password": "anna-password",
        "full_name": test_support::ANNA,
        "group_link": "1СОМ"
    });

    let (status, body) =
        call(&ctx.app, Method::POST, "/api/v1/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["user"]["role"], "student");
    assert!(body["access_token"].is_string());

    let (status, body) =
        call(&ctx.app, Method::POST, "/api/v1/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "User 'anna.a' already exists");
}

#[tokio::test]
async fn registration_rejects_short_passwords() {
    let ctx = test_support::setup_test_context().await;

    let (status, _) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "username": "shorty", "password": "123", "full_name": "Short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let ctx = test_support::setup_test_context().await;

    let (status, body) =
        call(&ctx.app, Method::GET, "/api/v1/auth/session", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid or expired session");
}

#[tokio::test]
async fn starting_a_session_prunes_expired_ones() {
    let ctx = test_support::setup_test_context().await;
    let lifetime = ctx.state.settings().security().token_lifetime();
    let stale_at = primitive_now_utc() - lifetime - time::Duration::minutes(1);
    repositories::sessions::create_anonymous(ctx.state.db(), "stale", Theme::Dark, stale_at)
        .await
        .expect("stale row");

    let (status, _) = call(&ctx.app, Method::POST, "/api/v1/auth/session", None, None).await;
    assert_eq!(status, StatusCode::CREATED);

    assert!(repositories::sessions::find_by_id(ctx.state.db(), "stale").await.unwrap().is_none());
    assert_eq!(repositories::sessions::count(ctx.state.db()).await.unwrap(), 1);
}
