//! `SeaORM` entity definitions.

pub mod active_questionnaires;
pub mod app_users;
pub mod configs;
pub mod discipler_profiles;
pub mod discipler_trainings;
pub mod discipleship_follow_ups;
pub mod discipleship_path_assignments;
pub mod discipleship_path_trainings;
pub mod discipleship_paths;
pub mod organisations;
pub mod prospects;
pub mod question_select_options;
pub mod questionnaire_logs;
pub mod questionnaires;
pub mod questions;
pub mod responses;
pub mod sea_orm_active_enums;
pub mod select_options;
pub mod trainee_profiles;
pub mod training_organisations;
pub mod trainings;
pub mod users;
