//! Integration tests for cookie sessions, the CSRF check, and health.

mod helpers;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use brainery_core::config::StoreBackend;
use helpers::TestApp;

#[tokio::test]
async fn test_cookie_mutation_requires_csrf_header() {
    let app = TestApp::new(StoreBackend::Document).await;
    let ada = app.user("Ada", "ada@test.com").await;
    let body = json!({ "title": "Calculus" });

    let rejected = app
        .request_with_cookie("POST", "/dashboard/save_topic", Some(body.clone()), &ada.token, None)
        .await;
    assert_eq!(rejected.status, StatusCode::FORBIDDEN);
    assert_eq!(rejected.body["error"], "CSRF_REJECTED");

    let forged = app
        .request_with_cookie(
            "POST",
            "/dashboard/save_topic",
            Some(body.clone()),
            &ada.token,
            Some("forged"),
        )
        .await;
    assert_eq!(forged.status, StatusCode::FORBIDDEN);

    let accepted = app
        .request_with_cookie(
            "POST",
            "/dashboard/save_topic",
            Some(body),
            &ada.token,
            Some(&ada.csrf_token),
        )
        .await;
    assert_eq!(accepted.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_cookie_reads_need_no_csrf() {
    let app = TestApp::new(StoreBackend::Relational).await;
    let ada = app.user("Ada", "ada@test.com").await;

    let list = app
        .request_with_cookie("GET", "/dashboard/saved_topics", None, &ada.token, None)
        .await;
    assert_eq!(list.status, StatusCode::OK);

    let check = app
        .request_with_cookie(
            "POST",
            "/check_email",
            Some(json!({ "email": "ada@test.com" })),
            &ada.token,
            None,
        )
        .await;
    assert_eq!(check.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cookie_logout_clears_cookie() {
    let app = TestApp::new(StoreBackend::Relational).await;
    let ada = app.user("Ada", "ada@test.com").await;

    let logout = app
        .request_with_cookie("POST", "/auth/logout", None, &ada.token, Some(&ada.csrf_token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    let cleared = logout.set_cookie.expect("removal cookie");
    assert!(cleared.starts_with("brainery_session=;"));

    let after = app
        .request_with_cookie("GET", "/me", None, &ada.token, None)
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_health_reports_backend(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    let health = app.request("GET", "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
    assert_eq!(health.body["backend"], backend.to_string());
}
