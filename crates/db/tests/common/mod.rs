//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database with the migrator
//! applied.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName, Name};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use shepherd_db::entities::{
    active_questionnaires, app_users, discipler_profiles, discipler_trainings,
    discipleship_follow_ups, discipleship_path_assignments, discipleship_paths, organisations,
    prospects, questionnaires, questions, responses,
    sea_orm_active_enums::{CompletionStatus, QuestionType, TraineeStatus, UserRole},
    trainee_profiles, training_organisations, trainings, users,
};
use shepherd_db::migration::Migrator;
use uuid::Uuid;

/// Creates an in-memory SQLite database with all migrations applied.
pub async fn create_test_db() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database.
    // It also serialises every query, so tests cannot interleave two
    // transactions; the unique-index fallbacks are reached by seeding the
    // conflicting row directly.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

/// Creates an organisation.
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
    .expect("Failed to create organisation")
}

/// Creates an organisation with an explicit creation time.
pub async fn create_organisation_at(
    db: &DatabaseConnection,
    name: &str,
    created_at: DateTime<Utc>,
) -> organisations::Model {
    organisations::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(format!("{}@example.org", Uuid::new_v4().simple())),
        phone_number: Set(None),
        created_at: Set(created_at.into()),
        updated_at: Set(created_at.into()),
    }
    .insert(db)
    .await
    .expect("Failed to create organisation")
}

/// Creates an application user with a fresh account.
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
        email: Set(SafeEmail().fake()),
        created_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to create user");

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
    .expect("Failed to create app user")
}

/// Creates a discipler with the given name.
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
        bio: Set(Some(format!("{first_name} mentors new members"))),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to create discipler")
}

/// Creates a discipler with a random name.
pub async fn create_random_discipler(
    db: &DatabaseConnection,
    organisation_id: Uuid,
) -> discipler_profiles::Model {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    create_discipler(db, organisation_id, &first, &last).await
}

/// Creates a questionnaire with `question_count` text questions.
pub async fn create_questionnaire(
    db: &DatabaseConnection,
    name: &str,
    question_count: i32,
) -> (questionnaires::Model, Vec<questions::Model>) {
    let questionnaire = questionnaires::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        title: Set(format!("{name} title")),
        description: Set(String::new()),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to create questionnaire");

    let mut created = Vec::new();
    // Inserted in reverse so sort order, not insertion order, decides.
    for order in (1..=question_count).rev() {
        let question = questions::ActiveModel {
            id: Set(Uuid::new_v4()),
            questionnaire_id: Set(questionnaire.id),
            text: Set(format!("Question {order}")),
            question_type: Set(QuestionType::Text),
            sort_order: Set(order),
        }
        .insert(db)
        .await
        .expect("Failed to create question");
        created.push(question);
    }
    created.sort_by_key(|q| q.sort_order);

    (questionnaire, created)
}

/// Activates a questionnaire for an organisation.
pub async fn activate(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    questionnaire_id: Uuid,
    is_active: bool,
) -> active_questionnaires::Model {
    active_questionnaires::ActiveModel {
        id: Set(Uuid::new_v4()),
        organisation_id: Set(organisation_id),
        questionnaire_id: Set(questionnaire_id),
        is_active: Set(is_active),
        activated_at: Set(now()),
        deactivated_at: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to activate questionnaire")
}

/// Records one response directly, with an explicit timestamp.
pub async fn create_response(
    db: &DatabaseConnection,
    question_id: Uuid,
    form_id: &str,
    submitted_at: DateTime<Utc>,
) -> responses::Model {
    responses::ActiveModel {
        id: Set(Uuid::new_v4()),
        question_id: Set(question_id),
        answer_text: Set("answer".to_string()),
        prospect_form_id: Set(form_id.to_string()),
        submitted_at: Set(submitted_at.into()),
    }
    .insert(db)
    .await
    .expect("Failed to create response")
}

/// Creates a prospect directly.
pub async fn create_prospect(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    form_id: &str,
    discipler_id: Option<Uuid>,
) -> prospects::Model {
    create_prospect_at(db, organisation_id, form_id, discipler_id, Utc::now()).await
}

/// Creates a prospect directly with an explicit creation time.
pub async fn create_prospect_at(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    form_id: &str,
    discipler_id: Option<Uuid>,
    created_at: DateTime<Utc>,
) -> prospects::Model {
    let name: String = Name().fake();
    prospects::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(format!("{}@example.com", Uuid::new_v4().simple())),
        phone_number: Set(None),
        prospect_form_id: Set(form_id.to_string()),
        organisation_id: Set(organisation_id),
        discipler_id: Set(discipler_id),
        joined_at: Set(created_at.into()),
        created_at: Set(created_at.into()),
        updated_at: Set(created_at.into()),
    }
    .insert(db)
    .await
    .expect("Failed to create prospect")
}

/// Creates a training offered by an organisation.
pub async fn create_training(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    name: &str,
) -> trainings::Model {
    let training = trainings::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to create training");

    training_organisations::ActiveModel {
        training_id: Set(training.id),
        organisation_id: Set(organisation_id),
    }
    .insert(db)
    .await
    .expect("Failed to offer training");

    training
}

/// Marks a training as completed by a discipler.
pub async fn complete_training(db: &DatabaseConnection, discipler_id: Uuid, training_id: Uuid) {
    discipler_trainings::ActiveModel {
        discipler_id: Set(discipler_id),
        training_id: Set(training_id),
    }
    .insert(db)
    .await
    .expect("Failed to record completed training");
}

/// Enrols a new trainee in a training.
pub async fn enrol_trainee(
    db: &DatabaseConnection,
    organisation_id: Uuid,
    training_id: Uuid,
    status: TraineeStatus,
) -> trainee_profiles::Model {
    let app_user = create_app_user(db, organisation_id, "Tess", "Trainee", UserRole::Trainee).await;
    trainee_profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        app_user_id: Set(app_user.id),
        training_id: Set(training_id),
        status: Set(status),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to enrol trainee")
}

/// Assigns a discipleship path to a prospect.
pub async fn assign_path(
    db: &DatabaseConnection,
    prospect_id: Uuid,
    status: CompletionStatus,
) -> discipleship_path_assignments::Model {
    let path = discipleship_paths::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Foundations".to_string()),
        description: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to create path");

    discipleship_path_assignments::ActiveModel {
        id: Set(Uuid::new_v4()),
        prospect_id: Set(prospect_id),
        discipleship_path_id: Set(path.id),
        completion_status: Set(status),
        assigned_at: Set(now()),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to assign path")
}

/// Schedules a follow-up.
pub async fn create_follow_up(
    db: &DatabaseConnection,
    prospect_id: Uuid,
    discipler_id: Uuid,
    follow_up_date: Option<DateTime<Utc>>,
) -> discipleship_follow_ups::Model {
    discipleship_follow_ups::ActiveModel {
        id: Set(Uuid::new_v4()),
        prospect_id: Set(prospect_id),
        discipler_id: Set(discipler_id),
        notes: Set(Some("Call after service".to_string())),
        follow_up_date: Set(follow_up_date.map(Into::into)),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await
    .expect("Failed to create follow-up")
}
