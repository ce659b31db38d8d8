//! HTTP tests for the assignment endpoints.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{TestApp, create_discipler, create_organisation, create_prospect};
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

#[rstest]
#[case("/api/assign-prospect")]
#[case("/api/assign-prospect-to-discipler")]
#[tokio::test]
async fn test_assign_with_form_body(#[case] uri: &str) {
    let app = TestApp::new().await;
    let org = create_organisation(&app.db, "Grace Fellowship").await;
    let discipler = create_discipler(&app.db, org.id, "Paul", "Otieno").await;
    let prospect = create_prospect(&app.db, org.id, "FORM-1").await;

    let response = app
        .post_form(
            uri,
            &format!("prospect_id={}&discipler_id={}", prospect.id, discipler.id),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(
        response.body["message"],
        format!("{} assigned to Paul Otieno", prospect.name)
    );
}

#[tokio::test]
async fn test_assign_with_json_body_is_idempotent() {
    let app = TestApp::new().await;
    let org = create_organisation(&app.db, "Grace Fellowship").await;
    let discipler = create_discipler(&app.db, org.id, "Ruth", "Abebe").await;
    let prospect = create_prospect(&app.db, org.id, "FORM-1").await;
    let body = json!({ "prospect_id": prospect.id, "discipler_id": discipler.id });

    let first = app.post_json("/api/assign-prospect", &body).await;
    let second = app.post_json("/api/assign-prospect", &body).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_assign_unknown_prospect() {
    let app = TestApp::new().await;
    let org = create_organisation(&app.db, "Grace Fellowship").await;
    let discipler = create_discipler(&app.db, org.id, "Paul", "Otieno").await;

    let response = app
        .post_json(
            "/api/assign-prospect",
            &json!({ "prospect_id": Uuid::new_v4(), "discipler_id": discipler.id }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Prospect not found");
}

#[tokio::test]
async fn test_assign_unknown_discipler() {
    let app = TestApp::new().await;
    let org = create_organisation(&app.db, "Grace Fellowship").await;
    let prospect = create_prospect(&app.db, org.id, "FORM-1").await;

    let response = app
        .post_form(
            "/api/assign-prospect-to-discipler",
            &format!("prospect_id={}&discipler_id={}", prospect.id, Uuid::new_v4()),
        )
        .await;

    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Discipler not found");
}

#[tokio::test]
async fn test_assign_missing_ids_is_invalid() {
    let app = TestApp::new().await;

    let response = app.post_form("/api/assign-prospect", "prospect_id=abc").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Invalid request");
}

#[rstest]
#[case("/api/assign-prospect")]
#[case("/api/assign-prospect-to-discipler")]
#[tokio::test]
async fn test_other_methods_are_invalid(#[case] uri: &str) {
    let app = TestApp::new().await;

    let response = app
        .send(Request::get(uri).body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Invalid request");
}
