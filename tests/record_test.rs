//! Integration tests for saved topics, resources, and the catalog.

mod helpers;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use brainery_core::config::StoreBackend;
use brainery_entity::catalog::{NewCatalogTopic, NewSubject};
use helpers::TestApp;

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_saving_same_title_twice_conflicts(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    let ada = app.user("Ada", "ada@test.com").await;
    let body = json!({ "title": "Calculus", "summary": "Limits and derivatives" });

    let first = app
        .request("POST", "/dashboard/save_topic", Some(body.clone()), Some(&ada.token))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["message"], "Topic saved successfully!");
    assert!(first.body["_id"].is_string());

    let again = app
        .request(
            "POST",
            "/dashboard/save_topic",
            Some(json!({ "title": "  calculus " })),
            Some(&ada.token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["error"], "DUPLICATE_TITLE");

    let list = app
        .request("GET", "/dashboard/saved_topics", None, Some(&ada.token))
        .await;
    assert_eq!(list.body.as_array().map(Vec::len), Some(1));
    assert_eq!(list.body[0]["summary"], "Limits and derivatives");
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_non_owner_sees_not_found(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    let ada = app.user("Ada", "ada@test.com").await;
    let bob = app.user("Bob", "bob@test.com").await;

    let saved = app
        .request(
            "POST",
            "/dashboard/save_topic",
            Some(json!({ "title": "Calculus" })),
            Some(&ada.token),
        )
        .await;
    let id = saved.body["_id"].as_str().unwrap().to_string();

    let delete = app
        .request("DELETE", &format!("/dashboard/delete_topic/{id}"), None, Some(&bob.token))
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let get = app
        .request("GET", &format!("/dashboard/get_topic/{id}"), None, Some(&bob.token))
        .await;
    let missing = app
        .request("GET", "/dashboard/get_topic/424242", None, Some(&bob.token))
        .await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);
    assert_eq!(get.body, missing.body);

    let rename = app
        .request(
            "PUT",
            &format!("/dashboard/update_topic/{id}"),
            Some(json!({ "new_title": "Stolen" })),
            Some(&bob.token),
        )
        .await;
    assert_eq!(rename.status, StatusCode::NOT_FOUND);

    let intact = app
        .request("GET", &format!("/dashboard/get_topic/{id}"), None, Some(&ada.token))
        .await;
    assert_eq!(intact.status, StatusCode::OK);
    assert_eq!(intact.body["title"], "Calculus");
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_rename_and_delete_topic(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    let ada = app.user("Ada", "ada@test.com").await;

    let mut ids = Vec::new();
    for title in ["Algebra", "Geometry"] {
        let saved = app
            .request(
                "POST",
                "/dashboard/save_topic",
                Some(json!({ "title": title })),
                Some(&ada.token),
            )
            .await;
        ids.push(saved.body["_id"].as_str().unwrap().to_string());
    }

    let collide = app
        .request(
            "PUT",
            &format!("/dashboard/update_topic/{}", ids[1]),
            Some(json!({ "new_title": "ALGEBRA" })),
            Some(&ada.token),
        )
        .await;
    assert_eq!(collide.status, StatusCode::CONFLICT);

    let blank = app
        .request(
            "PUT",
            &format!("/dashboard/update_topic/{}", ids[1]),
            Some(json!({ "new_title": "   " })),
            Some(&ada.token),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let renamed = app
        .request(
            "PUT",
            &format!("/dashboard/update_topic/{}", ids[1]),
            Some(json!({ "new_title": "Trigonometry" })),
            Some(&ada.token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);

    let deleted = app
        .request(
            "DELETE",
            &format!("/dashboard/delete_topic/{}", ids[0]),
            None,
            Some(&ada.token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let list = app
        .request("GET", "/dashboard/saved_topics", None, Some(&ada.token))
        .await;
    assert_eq!(list.body.as_array().map(Vec::len), Some(1));
    assert_eq!(list.body[0]["title"], "Trigonometry");
    assert_eq!(list.body[0]["summary"], "No summary available.");
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_catalog_browsing_and_summary_backfill(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    let math = app
        .stores
        .catalog
        .upsert_subject(&NewSubject {
            name: "Math".into(),
            icon: Some("calculator".into()),
        })
        .await
        .unwrap();
    app.stores
        .catalog
        .upsert_topic(
            &math.id,
            &NewCatalogTopic {
                title: "Calculus".into(),
                description: Some("Study of change".into()),
            },
        )
        .await
        .unwrap();
    let ada = app.user("Ada", "ada@test.com").await;

    let subjects = app
        .request("GET", "/dashboard/subjects", None, Some(&ada.token))
        .await;
    assert_eq!(subjects.body[0]["name"], "Math");
    let subject_id = subjects.body[0]["_id"].as_str().unwrap().to_string();

    let topics = app
        .request("GET", &format!("/dashboard/topics/{subject_id}"), None, Some(&ada.token))
        .await;
    assert_eq!(topics.body[0]["title"], "Calculus");

    app.request(
        "POST",
        "/dashboard/save_topic",
        Some(json!({ "title": "calculus" })),
        Some(&ada.token),
    )
    .await;
    let list = app
        .request("GET", "/dashboard/saved_topics", None, Some(&ada.token))
        .await;
    assert_eq!(list.body[0]["summary"], "Study of change");
}

#[rstest]
#[case::relational(StoreBackend::Relational)]
#[case::document(StoreBackend::Document)]
#[tokio::test]
async fn test_resource_lifecycle_and_ownership(#[case] backend: StoreBackend) {
    let app = TestApp::new(backend).await;
    let ada = app.user("Ada", "ada@test.com").await;
    let bob = app.user("Bob", "bob@test.com").await;

    let created = app
        .request(
            "POST",
            "/resources",
            Some(json!({
                "title": "Khan Academy",
                "link": "https://khanacademy.org",
                "category": "video",
            })),
            Some(&ada.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().unwrap().to_string();

    let updated = app
        .request(
            "PUT",
            &format!("/resources/{id}"),
            Some(json!({ "description": "Free lessons", "category": "" })),
            Some(&ada.token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["description"], "Free lessons");
    assert!(updated.body["category"].is_null());

    let foreign = app
        .request("DELETE", &format!("/resources/{id}"), None, Some(&bob.token))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    let bobs = app.request("GET", "/resources", None, Some(&bob.token)).await;
    assert_eq!(bobs.body, json!([]));

    let deleted = app
        .request("DELETE", &format!("/resources/{id}"), None, Some(&ada.token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    let gone = app
        .request("GET", &format!("/resources/{id}"), None, Some(&ada.token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resource_requires_title() {
    let app = TestApp::new(StoreBackend::Relational).await;
    let ada = app.user("Ada", "ada@test.com").await;

    let response = app
        .request("POST", "/resources", Some(json!({ "title": "  " })), Some(&ada.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["field"], "title");
}
