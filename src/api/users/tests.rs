use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::db::types::UserRole;
use crate::test_support::{self, call, query_uri, ANNA};

#[tokio::test]
async fn admin_can_create_teacher_once() {
    let ctx = test_support::setup_test_context().await;
    let token = test_support::admin_token(&ctx.app).await;

    let payload = json!({
        "username": "kovalenko",
        "password": "teacher-pass",
        "role": "teacher",
        "full_name": "Коваленко Ірина Петрівна",
        "group_link": "Staff"
    });

    let (status, created) =
        call(&ctx.app, Method::POST, "/api/v1/users", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["username"], "kovalenko");
    assert_eq!(created["role"], "teacher");
    assert!(created.get("hashed_password").is_none());

    let (status, _) =
        call(&ctx.app, Method::POST, "/api/v1/users", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let teacher = test_support::login(&ctx.app, "kovalenko", "teacher-pass").await;
    let (status, body) = call(&ctx.app, Method::GET, "/api/v1/auth/me", Some(&teacher), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "teacher");
}

#[tokio::test]
async fn only_admins_create_users() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_user(
        ctx.state.db(),
        "kovalenko",
        "Коваленко Ірина Петрівна",
        "teacher-pass",
        UserRole::Teacher,
    )
    .await;
    let teacher = test_support::login(&ctx.app, "kovalenko", "teacher-pass").await;

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/users",
        Some(&teacher),
        Some(json!({
            "username": "intruder",
            "password": "intruder-pass",
            "role": "admin",
            "full_name": "Intruder"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not enough permissions");

    let (status, _) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "intruder", "password": "intruder-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_links_student_account_to_roster_entry() {
    let ctx = test_support::setup_test_context().await;
    let token = test_support::admin_token(&ctx.app).await;

    let roster = query_uri("/api/v1/students", &[("group", "1СОМ")]);
    let (status, students) = call(&ctx.app, Method::GET, &roster, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let student_id = students[0]["id"].as_i64().expect("student id");

    let account = |username: &str, role: &str, student_id: i64| {
        json!({
            "username": username,
            "password": "anna-password",
            "role": role,
            "full_name": ANNA,
            "group_link": "1СОМ",
            "student_id": student_id
        })
    };

    let (status, created) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(account("anna.a", "student", student_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["student_id"], student_id);

    let (status, _) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(account("anna.b", "student", student_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(account("anna.t", "teacher", student_id)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &ctx.app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(account("anna.c", "student", student_id + 1000)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
