//! Integration tests for registration, login, and logout.

mod helpers;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use brainery_core::config::StoreBackend;
use helpers::{PASSWORD, TestApp};

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_register_then_login_with_other_casing(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    let registered = app.register("Ada", "A@Test.com").await;
    assert_eq!(registered.body["user"]["username"], "Ada Tester");

    let session = app.login("a@test.com", PASSWORD).await;
    assert_eq!(session.landing, "/dashboard");

    let me = app.request("GET", "/me", None, Some(&session.token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["role"], "user");
    assert_eq!(me.body["is_admin"], false);
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_duplicate_registration_modulo_case(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    app.register("Ada", "A@Test.com").await;

    let response = app
        .request(
            "POST",
            "/register",
            Some(json!({
                "first_name": "Other",
                "last_name": "Person",
                "email": "  a@test.COM ",
                "password": PASSWORD,
                "confirm_password": PASSWORD,
                "selected_plan": "pro",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "DUPLICATE_IDENTITY");
    assert_eq!(app.stores.identities.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_registration_field_errors() {
    let app = TestApp::new(StoreBackend::Document).await;
    let base = json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@test.com",
        "password": PASSWORD,
        "confirm_password": PASSWORD,
        "selected_plan": "free",
    });

    let mut weak = base.clone();
    weak["password"] = json!("abcdef");
    weak["confirm_password"] = json!("abcdef");
    let response = app.request("POST", "/register", Some(weak), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["field"], "password");

    let mut no_plan = base.clone();
    no_plan["selected_plan"] = json!("");
    let response = app.request("POST", "/register", Some(no_plan), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["field"], "selected_plan");

    assert_eq!(app.stores.identities.count().await.unwrap(), 0);
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_login_failures_are_indistinguishable(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    app.register("Ada", "ada@test.com").await;

    let unknown = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "nobody@test.com", "password": PASSWORD })),
            None,
        )
        .await;
    let wrong = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "ada@test.com", "password": "Abc124!" })),
            None,
        )
        .await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn test_login_sets_session_cookie_and_greets() {
    let app = TestApp::new(StoreBackend::Relational).await;
    app.register("Ada", "ada@test.com").await;

    let response = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "ada@test.com", "password": PASSWORD, "remember": true })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.set_cookie.expect("session cookie");
    assert!(cookie.starts_with("brainery_session="));
    assert!(cookie.contains("HttpOnly"));

    let token = response.body["token"].as_str().unwrap();
    let notices = app.request("GET", "/notices", None, Some(token)).await;
    assert_eq!(notices.body[0]["message"], "Logged in successfully!");
    let drained = app.request("GET", "/notices", None, Some(token)).await;
    assert_eq!(drained.body, json!([]));
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_logout_makes_token_unusable(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    let session = app.user("Ada", "ada@test.com").await;

    let response = app
        .request("POST", "/auth/logout", None, Some(&session.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "You have been logged out.");

    let me = app.request("GET", "/me", None, Some(&session.token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_requests_are_unauthenticated() {
    let app = TestApp::new(StoreBackend::Document).await;
    let response = app.request("GET", "/dashboard/saved_topics", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");

    let forged = app
        .request("GET", "/dashboard/saved_topics", None, Some("not-a-token"))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_reset_password(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    app.register("Ada", "ada@test.com").await;

    let missing = app
        .request(
            "POST",
            "/auth/reset_password",
            Some(json!({ "email": "nobody@test.com", "new_password": "Xyz789#" })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let weak = app
        .request(
            "POST",
            "/auth/reset_password",
            Some(json!({ "email": "ada@test.com", "new_password": "short" })),
            None,
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);

    let reset = app
        .request(
            "POST",
            "/auth/reset_password",
            Some(json!({ "email": "ADA@test.com", "new_password": "Xyz789#" })),
            None,
        )
        .await;
    assert_eq!(reset.status, StatusCode::OK);
    app.login("ada@test.com", "Xyz789#").await;
}

#[tokio::test]
async fn test_check_email() {
    let app = TestApp::new(StoreBackend::Relational).await;
    app.register("Ada", "ada@test.com").await;

    let taken = app
        .request("POST", "/check_email", Some(json!({ "email": "ADA@test.com" })), None)
        .await;
    assert_eq!(taken.status, StatusCode::OK);
    assert_eq!(taken.body["exists"], true);

    let free = app
        .request("POST", "/check_email", Some(json!({ "email": "bob@test.com" })), None)
        .await;
    assert_eq!(free.body["exists"], false);

    let blank = app
        .request("POST", "/check_email", Some(json!({ "email": " " })), None)
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[case::register("/register")]
#[case::check_email("/check_email")]
#[case::reset_password("/auth/reset_password")]
#[case::login("/auth/login")]
#[tokio::test]
async fn test_malformed_body_is_a_validation_error(#[case] path: &str) {
    let app = TestApp::new(StoreBackend::Document).await;

    let response = app.request_raw("POST", path, "{not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
    assert!(response.body["message"].is_string());

    let wrong_type = app.request_raw("POST", path, r#"{"email": 5}"#).await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["error"], "VALIDATION");
}
