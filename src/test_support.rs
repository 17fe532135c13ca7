use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower::ServiceExt;

use crate::api;
use crate::core::{bootstrap, config::Settings, state::AppState};
use crate::db::types::UserRole;
use crate::repositories;
use crate::services::credentials::{self, NewUser};

const TEST_SECRET_KEY: &str = "test-secret";

pub(crate) const ADMIN_PASSWORD: &str = "admin";
pub(crate) const ANNA: &str = "Алексєєнко Анна Олександрівна";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("RECORDS_ENV", "test");
    std::env::set_var("RECORDS_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("ENVIRONMENT");
    std::env::remove_var("SEED_ADMIN_USERNAME");
    std::env::remove_var("SEED_ADMIN_PASSWORD");
    std::env::remove_var("REFERENCE_DATA_PATH");
    std::env::remove_var("GRADE_MIN");
    std::env::remove_var("GRADE_MAX");
    std::env::remove_var("API_V1_STR");
    std::env::remove_var("PROJECT_NAME");
}

/// A private in-memory database with the schema applied. One connection
/// that never recycles, since the data lives and dies with it.
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new().in_memory(true).foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory pool");
    crate::db::run_migrations(&pool).await.expect("migrations");
    pool
}

/// Router over a fresh database seeded like a first start: the default
/// admin plus the built-in rosters.
pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let state = AppState::new(settings, test_pool().await);
    bootstrap::seed(&state).await.expect("seed");
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

pub(crate) async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    full_name: &str,
    password: &str,
    role: UserRole,
) {
    credentials::create(
        pool,
        NewUser { username, password, role, full_name, group_link: "", student_id: None },
    )
    .await
    .expect("insert user");
}

/// Student account linked to an existing roster entry of `group`.
pub(crate) async fn insert_student_account(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    group: &str,
    full_name: &str,
) {
    let student = repositories::students::list_by_group(pool, group)
        .await
        .expect("roster")
        .into_iter()
        .find(|student| student.full_name == full_name)
        .expect("roster entry");

    credentials::create(
        pool,
        NewUser {
            username,
            password,
            role: UserRole::Student,
            full_name,
            group_link: group,
            student_id: Some(student.id),
        },
    )
    .await
    .expect("insert student account");
}

/// Logs in through the API and returns the issued bearer token.
pub(crate) async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ))
        .await
        .expect("login response");

    let status = response.status();
    let body = read_json(response).await;
    assert!(status.is_success(), "login failed: {status} {body}");
    body["access_token"].as_str().expect("access token").to_string()
}

pub(crate) async fn admin_token(app: &Router) -> String {
    login(app, "admin", ADMIN_PASSWORD).await
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

/// Sends one request through `app` and returns status plus JSON body
/// (`Null` for empty bodies).
pub(crate) async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let response =
        app.clone().oneshot(json_request(method, uri, token, body)).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    if bytes.is_empty() {
        return (status, serde_json::Value::Null);
    }
    let value = serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!("json parse: {err}; body: {}", String::from_utf8_lossy(&bytes));
    });
    (status, value)
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}

/// Builds `path?key=value&...` with percent-encoded values, since group and
/// subject names are not ASCII.
pub(crate) fn query_uri(path: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (byte as char).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}
