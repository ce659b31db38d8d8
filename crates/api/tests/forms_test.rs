//! HTTP tests for the questionnaire and funnel routes.

mod common;

use axum::http::StatusCode;
use common::{TestApp, create_active_questionnaire, create_organisation};
use rstest::rstest;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use shepherd_db::entities::{prospects, questionnaire_logs, responses};
use uuid::Uuid;

async fn log_count(app: &TestApp, form_id: &str, action: &str) -> u64 {
    questionnaire_logs::Entity::find()
        .filter(questionnaire_logs::Column::FormId.eq(form_id))
        .filter(questionnaire_logs::Column::Action.eq(action))
        .count(&app.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_open_form_issues_form_id() {
    let app = TestApp::new().await;
    let org = create_organisation(&app.db, "Grace Fellowship").await;
    let (questionnaire, questions) = create_active_questionnaire(&app.db, org.id, 3).await;

    let response = app.get(&format!("/forms/{}", questionnaire.id)).await;

    assert_eq!(response.status, StatusCode::OK);
    let form_id = response.body["new_form_id"].as_str().unwrap().to_string();
    assert_eq!(form_id.len(), 32);
    assert_eq!(response.body["questions"].as_array().unwrap().len(), questions.len());
    assert_eq!(log_count(&app, &form_id, "form_viewed").await, 1);
}

#[tokio::test]
async fn test_open_unknown_form_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get(&format!("/forms/{}", Uuid::new_v4())).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "not_found");
}

#[tokio::test]
async fn test_submit_then_resubmit() {
    let app = TestApp::new().await;
    let org = create_organisation(&app.db, "Grace Fellowship").await;
    let (questionnaire, questions) = create_active_questionnaire(&app.db, org.id, 2).await;
    let uri = format!("/forms/{}/submit", questionnaire.id);
    let body = format!(
        "new_form_id=FORM-1&question_{}=Yes&question_{}=Sunday",
        questions[0].id, questions[1].id
    );

    let first = app.post_form(&uri, &body).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["duplicate"], false);
    assert_eq!(first.body["responses_created"], 2);
    assert_eq!(first.body["next"]["join"], "/forms/prospect/FORM-1/join");

    let second = app.post_form(&uri, &body).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["duplicate"], true);
    assert_eq!(second.body["responses_created"], 0);

    let stored = responses::Entity::find()
        .filter(responses::Column::ProspectFormId.eq("FORM-1"))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(stored, 2);
}

#[tokio::test]
async fn test_submit_without_form_id_is_bad_request() {
    let app = TestApp::new().await;
    let org = create_organisation(&app.db, "Grace Fellowship").await;
    let (questionnaire, _) = create_active_questionnaire(&app.db, org.id, 1).await;

    let response = app
        .post_form(&format!("/forms/{}/submit", questionnaire.id), "")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "bad_request");
}

#[tokio::test]
async fn test_join_creates_one_prospect() {
    let app = TestApp::new().await;
    let org = create_organisation(&app.db, "Grace Fellowship").await;
    let (questionnaire, questions) = create_active_questionnaire(&app.db, org.id, 1).await;
    app.post_form(
        &format!("/forms/{}/submit", questionnaire.id),
        &format!("new_form_id=FORM-9&question_{}=Yes", questions[0].id),
    )
    .await;

    let shown = app.get("/forms/prospect/FORM-9/join").await;
    assert_eq!(shown.status, StatusCode::OK);
    assert_eq!(shown.body["action"], "prospect_signing_up");

    let joined = app
        .post_form(
            "/forms/prospect/FORM-9/join",
            "name=Mary+Wanjiru&email=mary%40example.com&phone=0700000000",
        )
        .await;
    assert_eq!(joined.status, StatusCode::CREATED);
    assert_eq!(joined.body["prospect_form_id"], "FORM-9");

    let again = app
        .post_form(
            "/forms/prospect/FORM-9/join",
            "name=Mary+Wanjiru&email=mary%40example.com",
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["error"], "conflict");

    let count = prospects::Entity::find()
        .filter(prospects::Column::ProspectFormId.eq("FORM-9"))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(log_count(&app, "FORM-9", "prospect_signed_up").await, 1);
}

#[tokio::test]
async fn test_join_without_email_is_bad_request() {
    let app = TestApp::new().await;
    create_organisation(&app.db, "Grace Fellowship").await;

    let response = app
        .post_form("/forms/prospect/FORM-2/join", "name=Mary")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("no-join", "prospect_declined")]
#[case("self-study", "prospect_self_study_signup")]
#[case("final-success", "prospect_final_success")]
#[tokio::test]
async fn test_follow_up_steps_are_logged(#[case] step: &str, #[case] action: &str) {
    let app = TestApp::new().await;

    let response = app.get(&format!("/forms/prospect/FORM-5/{step}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["action"], action);
    assert_eq!(response.body["form_id"], "FORM-5");
    assert_eq!(log_count(&app, "FORM-5", action).await, 1);
}

#[tokio::test]
async fn test_blank_form_id_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.get("/forms/prospect/%20/no-join").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
