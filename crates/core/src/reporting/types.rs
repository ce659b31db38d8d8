//! Report data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organisation a report is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationSummary {
    /// Organisation ID.
    pub id: Uuid,
    /// Organisation name.
    pub name: String,
}

/// Response volume of one active questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireVolume {
    /// Questionnaire ID.
    pub questionnaire_id: Uuid,
    /// Questionnaire name.
    pub name: String,
    /// Questionnaire title.
    pub title: String,
    /// Distinct submissions ever recorded.
    pub total_responses: u64,
    /// Distinct submissions since the watermark.
    pub new_responses: u64,
}

/// A follow-up whose due date has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueFollowUp {
    /// Follow-up ID.
    pub id: Uuid,
    /// Prospect ID.
    pub prospect_id: Uuid,
    /// Prospect name.
    pub prospect_name: String,
    /// Discipler profile ID.
    pub discipler_id: Uuid,
    /// Discipler display name.
    pub discipler_name: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Due date.
    pub follow_up_date: DateTime<Utc>,
}

/// Home page report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeReport {
    /// Scope.
    pub organisation: OrganisationSummary,
    /// Watermark the "new" counts are measured from.
    pub since: DateTime<Utc>,
    /// All prospects of the organisation.
    pub total_prospects: u64,
    /// Prospects created since the watermark.
    pub new_prospects: u64,
    /// Distinct submissions across active questionnaires.
    pub total_responses: u64,
    /// Distinct submissions since the watermark.
    pub new_responses: u64,
    /// Per-questionnaire breakdown.
    pub questionnaires: Vec<QuestionnaireVolume>,
    /// Overdue follow-ups, most overdue first.
    pub due_follow_ups: Vec<DueFollowUp>,
}

/// Prospects with at least one recorded response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceData {
    /// Prospects with responses.
    pub accepted: u64,
    /// Prospects without responses.
    pub pending: u64,
    /// Percentage accepted, one decimal.
    pub rate: Decimal,
}

/// Prospects with a discipler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentData {
    /// Prospects with a discipler.
    pub assigned: u64,
    /// Prospects without one.
    pub unassigned: u64,
    /// Percentage assigned, one decimal.
    pub rate: Decimal,
}

/// Discipleship path assignments by completion status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStatusCounts {
    /// Not started.
    pub not_started: u64,
    /// In progress.
    pub in_progress: u64,
    /// Stalled.
    pub stalled: u64,
    /// Completed.
    pub completed: u64,
}

impl CompletionStatusCounts {
    /// Total assignments.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.not_started + self.in_progress + self.stalled + self.completed
    }
}

/// Discipleship completion summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscipleshipData {
    /// Counts by status.
    #[serde(flatten)]
    pub counts: CompletionStatusCounts,
    /// Total assignments.
    pub total: u64,
    /// Percentage completed, one decimal.
    pub rate: Decimal,
}

/// One calendar day's window in UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    /// Abbreviated weekday name.
    pub label: String,
    /// Local calendar date.
    pub date: NaiveDate,
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

/// Responses recorded on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyResponseCount {
    /// Abbreviated weekday name.
    pub day: String,
    /// Local calendar date.
    pub date: NaiveDate,
    /// Response rows recorded that day.
    pub count: u64,
}

/// Load classification of the discipler pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioHealth {
    /// At or under the recommended ratio.
    Healthy,
    /// Over the recommended ratio.
    Overloaded,
}

/// Prospects per discipler versus the recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioData {
    /// Current prospects per discipler, one decimal.
    pub current: Decimal,
    /// Recommended prospects per discipler.
    pub recommended: Decimal,
    /// Disciplers in the organisation.
    pub total_disciplers: u64,
    /// Prospects in the organisation.
    pub total_prospects: u64,
    /// Classification.
    pub health: RatioHealth,
}

/// Trainee profiles by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraineeStatusCounts {
    /// Enrolled.
    pub enrolled: u64,
    /// In progress.
    pub in_progress: u64,
    /// Stalled.
    pub stalled: u64,
    /// Completed.
    pub completed: u64,
    /// Dropped.
    pub dropped: u64,
}

impl TraineeStatusCounts {
    /// Total trainees.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.enrolled + self.in_progress + self.stalled + self.completed + self.dropped
    }
}

/// Completion summary for one training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCompletion {
    /// Training ID.
    pub training_id: Uuid,
    /// Training name.
    pub name: String,
    /// Trainees enrolled in any status.
    pub total_trainees: u64,
    /// Counts by status.
    pub statuses: TraineeStatusCounts,
    /// Percentage completed, one decimal.
    pub completion_rate: Decimal,
}

/// Dashboard report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Scope.
    pub organisation: OrganisationSummary,
    /// Acceptance.
    pub acceptance: AcceptanceData,
    /// Assignment.
    pub assignment: AssignmentData,
    /// Discipleship completion.
    pub discipleship: DiscipleshipData,
    /// Responses over the last seven days, oldest first.
    pub daily_responses: Vec<DailyResponseCount>,
    /// Discipler load.
    pub ratio: RatioData,
    /// Per-training completion.
    pub trainings: Vec<TrainingCompletion>,
    /// Distinct submissions per active questionnaire, one decimal.
    pub avg_responses_per_questionnaire: Decimal,
    /// Active questionnaires.
    pub total_questionnaires: u64,
}
