//! Shared helpers for HTTP tests.
//!
//! Each test drives the full router against its own in-memory SQLite
//! database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use fake::Fake;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use shepherd_api::{AppState, ReportingSettings, create_router};
use shepherd_db::entities::{
    active_questionnaires, app_users, discipler_profiles, organisations, prospects,
    questionnaires, questions, sea_orm_active_enums::{QuestionType, UserRole}, users,
};
use shepherd_db::migration::Migrator;
use shepherd_shared::{JwtConfig, JwtService};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-for-testing";

/// Test application: the router plus direct database access for fixtures.
pub struct TestApp {
    pub db: DatabaseConnection,
    pub router: Router,
    pub jwt: JwtService,
}

/// Response status and parsed JSON body.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: serde_json::Value,
}

impl TestApp {
    pub async fn new() -> Self {
        // One connection to the in-memory database; requests never overlap.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run test migrations");

        let jwt = JwtService::new(JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expires_minutes: 15,
        });

        let state = AppState {
            db: Arc::new(db.clone()),
            jwt_service: Arc::new(jwt.clone()),
            reporting: ReportingSettings::default(),
        };

        Self {
            db,
            router: create_router(state),
            jwt,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_with(&self, uri: &str, name: header::HeaderName, value: &str) -> TestResponse {
        self.send(
            Request::get(uri)
                .header(name, value)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &serde_json::Value) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

pub async fn create_organisation(db: &DatabaseConnection, name: &str) -> organisations::Model {
    organisations::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(format!("{}@example.org", Uuid::new_v4().simple())),
        phone_number: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_app_user(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    first_name: &str,
    last_name: &str,
    role: UserRole,
) -> app_users::Model {
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(format!("user-{}", Uuid::new_v4().simple())),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(format!("{}@example.org", Uuid::new_v4().simple())),
        created_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap();

    app_users::ActiveModel {
        id: Set(Uuid::new_v4()),
        organisation_id: Set(organisation_id),
        user_id: Set(user.id),
        role: Set(role),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_discipler(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    first_name: &str,
    last_name: &str,
) -> discipler_profiles::Model {
    let app_user =
        create_app_user(db, organisation_id, first_name, last_name, UserRole::Discipler).await;
    discipler_profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        app_user_id: Set(app_user.id),
        bio: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap()
}

/// Creates a questionnaire with text questions, active for the organisation.
pub async fn create_active_questionnaire(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    question_count: i32,
) -> (questionnaires::Model, Vec<questions::Model>) {
    let questionnaire = questionnaires::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Intake".to_string()),
        title: Set("Welcome".to_string()),
        description: Set(String::new()),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap();

    let mut created = Vec::new();
    for order in 1..=question_count {
        created.push(
            questions::ActiveModel {
                id: Set(Uuid::new_v4()),
                questionnaire_id: Set(questionnaire.id),
                text: Set(format!("Question {order}")),
                question_type: Set(QuestionType::Text),
                sort_order: Set(order),
            }
            .insert(db)
            .await
            .unwrap(),
        );
    }

    active_questionnaires::ActiveModel {
        id: Set(Uuid::new_v4()),
        organisation_id: Set(organisation_id),
        questionnaire_id: Set(questionnaire.id),
        is_active: Set(true),
        activated_at: Set(now()),
        deactivated_at: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap();

    (questionnaire, created)
}

pub async fn create_prospect(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    form_id: &str,
) -> prospects::Model {
    let name: String = Name().fake();
    prospects::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(format!("{}@example.com", Uuid::new_v4().simple())),
        phone_number: Set(None),
        prospect_form_id: Set(form_id.to_string()),
        organisation_id: Set(organisation_id),
        discipler_id: Set(None),
        joined_at: Set(now()),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap()
}
