//! Enum columns stored as strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of an application user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Organisation administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Mentor who takes on prospects.
    #[sea_orm(string_value = "discipler")]
    Discipler,
    /// Enrolled in a training.
    #[sea_orm(string_value = "trainee")]
    Trainee,
}

/// Progress of a trainee through their training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum TraineeStatus {
    /// Enrolled, not started.
    #[sea_orm(string_value = "enrolled")]
    Enrolled,
    /// Working through the training.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// No recent progress.
    #[sea_orm(string_value = "stalled")]
    Stalled,
    /// Finished.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Left the training.
    #[sea_orm(string_value = "dropped")]
    Dropped,
}

/// Progress of a prospect through a discipleship path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Assigned, not started.
    #[sea_orm(string_value = "not_started")]
    NotStarted,
    /// Under way.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// No recent progress.
    #[sea_orm(string_value = "stalled")]
    Stalled,
    /// Finished.
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Free text.
    #[sea_orm(string_value = "text")]
    Text,
    /// One of the linked select options.
    #[sea_orm(string_value = "select")]
    Select,
}
