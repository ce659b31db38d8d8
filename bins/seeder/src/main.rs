//! Database seeder for Shepherd development and testing.
//!
//! Seeds a sample organisation with an admin and a discipler, three
//! questionnaires with sample responses, a training, and the recommended
//! discipler:prospect ratio. Rows that already exist are skipped, so the
//! seeder can be re-run.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use shepherd_core::settings::{ConfigSetting, DisciplerProspectRatio};
use shepherd_db::SettingsRepository;
use shepherd_db::entities::{
    active_questionnaires, app_users, discipler_profiles, organisations,
    question_select_options, questionnaires, questions, responses,
    sea_orm_active_enums::{QuestionType, UserRole},
    select_options, training_organisations, trainings, users,
};
use uuid::Uuid;

/// Sample organisation ID (consistent for all seeds)
const ORG_ID: Uuid = Uuid::from_u128(1);
const ADMIN_USER_ID: Uuid = Uuid::from_u128(2);
const ADMIN_APP_USER_ID: Uuid = Uuid::from_u128(3);
const DISCIPLER_USER_ID: Uuid = Uuid::from_u128(4);
const DISCIPLER_APP_USER_ID: Uuid = Uuid::from_u128(5);
const DISCIPLER_PROFILE_ID: Uuid = Uuid::from_u128(6);
const TRAINING_ID: Uuid = Uuid::from_u128(7);

const QUESTIONNAIRE_COUNT: u128 = 3;
const QUESTIONS_PER_QUESTIONNAIRE: i32 = 5;
/// Question orders rendered as a select.
const SELECT_ORDERS: [i32; 2] = [2, 4];
const OPTION_TEXTS: [&str; 3] = ["Option A", "Option B", "Option C"];
const RECOMMENDED_RATIO: &str = "3";

fn questionnaire_id(index: u128) -> Uuid {
    Uuid::from_u128(0x100 + index)
}

fn question_id(questionnaire: u128, order: i32) -> Uuid {
    Uuid::from_u128(0x200 + questionnaire * 0x10 + u128::from(order.unsigned_abs()))
}

fn option_id(index: usize) -> Uuid {
    Uuid::from_u128(0x300 + u128::try_from(index).unwrap_or_default())
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = shepherd_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding organisation...");
    seed_organisation(&db).await?;

    println!("Seeding users...");
    seed_users(&db).await?;

    println!("Seeding select options...");
    seed_select_options(&db).await?;

    println!("Seeding questionnaires...");
    for index in 1..=QUESTIONNAIRE_COUNT {
        seed_questionnaire(&db, index).await?;
    }

    println!("Seeding training...");
    seed_training(&db).await?;

    println!("Seeding configuration...");
    seed_config(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the sample organisation.
async fn seed_organisation(db: &DatabaseConnection) -> Result<(), DbErr> {
    if organisations::Entity::find_by_id(ORG_ID).one(db).await?.is_some() {
        println!("  Organisation already exists, skipping...");
        return Ok(());
    }

    organisations::ActiveModel {
        id: Set(ORG_ID),
        name: Set("Grace Fellowship".to_string()),
        email: Set("office@gracefellowship.example".to_string()),
        phone_number: Set(Some("+254700000000".to_string())),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;

    println!("  Created organisation: Grace Fellowship");
    Ok(())
}

async fn seed_account(
    db: &DatabaseConnection,
    user_id: Uuid,
    app_user_id: Uuid,
    (first_name, last_name): (&str, &str),
    role: UserRole,
) -> Result<bool, DbErr> {
    if app_users::Entity::find_by_id(app_user_id).one(db).await?.is_some() {
        println!("  {first_name} {last_name} already exists, skipping...");
        return Ok(false);
    }

    users::ActiveModel {
        id: Set(user_id),
        username: Set(first_name.to_lowercase()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(format!("{}@gracefellowship.example", first_name.to_lowercase())),
        created_at: Set(now()),
    }
    .insert(db)
    .await?;

    app_users::ActiveModel {
        id: Set(app_user_id),
        organisation_id: Set(ORG_ID),
        user_id: Set(user_id),
        role: Set(role),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;

    println!("  Created {first_name} {last_name}");
    Ok(true)
}

/// Seeds an admin and a discipler.
async fn seed_users(db: &DatabaseConnection) -> Result<(), DbErr> {
    seed_account(db, ADMIN_USER_ID, ADMIN_APP_USER_ID, ("Admin", "User"), UserRole::Admin).await?;

    let created = seed_account(
        db,
        DISCIPLER_USER_ID,
        DISCIPLER_APP_USER_ID,
        ("Paul", "Otieno"),
        UserRole::Discipler,
    )
    .await?;

    if created {
        discipler_profiles::ActiveModel {
            id: Set(DISCIPLER_PROFILE_ID),
            app_user_id: Set(DISCIPLER_APP_USER_ID),
            bio: Set(Some("Leads the new members class".to_string())),
            created_at: Set(now()),
            updated_at: Set(now()),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

/// Seeds the option set shared by every select question.
async fn seed_select_options(db: &DatabaseConnection) -> Result<(), DbErr> {
    for (index, text) in OPTION_TEXTS.iter().enumerate() {
        if select_options::Entity::find_by_id(option_id(index)).one(db).await?.is_some() {
            continue;
        }
        select_options::ActiveModel {
            id: Set(option_id(index)),
            text: Set((*text).to_string()),
            value: Set(Some((*text).to_string())),
            sort_order: Set(i32::try_from(index + 1).unwrap_or(i32::MAX)),
            created_at: Set(now()),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Seeds one questionnaire with its questions, one sample submission, and
/// its activation for the organisation.
async fn seed_questionnaire(db: &DatabaseConnection, index: u128) -> Result<(), DbErr> {
    let id = questionnaire_id(index);
    let title = format!("Sample Questionnaire {index}");

    if questionnaires::Entity::find_by_id(id).one(db).await?.is_some() {
        println!("  {title} already exists, skipping...");
        return Ok(());
    }

    questionnaires::ActiveModel {
        id: Set(id),
        name: Set(format!("questionnaire_{index}")),
        title: Set(title.clone()),
        description: Set(format!("Sample questionnaire {index}.")),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;

    let form_id = format!("sample_form_{index}");
    for order in 1..=QUESTIONS_PER_QUESTIONNAIRE {
        let is_select = SELECT_ORDERS.contains(&order);
        let text = format!("Question {order} for {title}");

        let question = questions::ActiveModel {
            id: Set(question_id(index, order)),
            questionnaire_id: Set(id),
            text: Set(text.clone()),
            question_type: Set(if is_select {
                QuestionType::Select
            } else {
                QuestionType::Text
            }),
            sort_order: Set(order),
        }
        .insert(db)
        .await?;

        if is_select {
            for option in 0..OPTION_TEXTS.len() {
                question_select_options::ActiveModel {
                    question_id: Set(question.id),
                    select_option_id: Set(option_id(option)),
                }
                .insert(db)
                .await?;
            }
        }

        let answer = if is_select {
            OPTION_TEXTS[0].to_string()
        } else {
            format!("Sample answer for {text}")
        };
        let exists = responses::Entity::find()
            .filter(responses::Column::QuestionId.eq(question.id))
            .filter(responses::Column::ProspectFormId.eq(form_id.as_str()))
            .count(db)
            .await?
            > 0;
        if !exists {
            responses::ActiveModel {
                id: Set(Uuid::new_v4()),
                question_id: Set(question.id),
                answer_text: Set(answer),
                prospect_form_id: Set(form_id.clone()),
                submitted_at: Set(now()),
            }
            .insert(db)
            .await?;
        }
    }

    active_questionnaires::ActiveModel {
        id: Set(Uuid::new_v4()),
        organisation_id: Set(ORG_ID),
        questionnaire_id: Set(id),
        is_active: Set(true),
        activated_at: Set(now()),
        deactivated_at: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;

    println!("  Created {title} with {QUESTIONS_PER_QUESTIONNAIRE} questions");
    Ok(())
}

/// Seeds a training offered by the organisation.
async fn seed_training(db: &DatabaseConnection) -> Result<(), DbErr> {
    if trainings::Entity::find_by_id(TRAINING_ID).one(db).await?.is_some() {
        println!("  Training already exists, skipping...");
        return Ok(());
    }

    trainings::ActiveModel {
        id: Set(TRAINING_ID),
        name: Set("Foundations of Faith".to_string()),
        description: Set(Some("Introductory discipleship training".to_string())),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;

    training_organisations::ActiveModel {
        training_id: Set(TRAINING_ID),
        organisation_id: Set(ORG_ID),
    }
    .insert(db)
    .await?;

    println!("  Created training: Foundations of Faith");
    Ok(())
}

/// Seeds the recommended discipler:prospect ratio.
async fn seed_config(db: &DatabaseConnection) -> Result<(), DbErr> {
    let settings = SettingsRepository::new(db.clone());
    let key = DisciplerProspectRatio::KEY;

    if settings.raw(key).await?.is_some() {
        println!("  {key} already set, skipping...");
        return Ok(());
    }

    settings.set(key, RECOMMENDED_RATIO).await?;
    println!("  Set {key} = {RECOMMENDED_RATIO}");
    Ok(())
}
