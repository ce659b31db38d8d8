//! Reporting repository for home and dashboard reports.
//!
//! Counting happens here; rates, ratios and day windows come from
//! `shepherd_core::reporting`.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Query},
};
use shepherd_core::reporting::{
    CompletionStatusCounts, DashboardReport, DueFollowUp, HomeReport, OrganisationSummary,
    QuestionnaireVolume, ReportingService, TraineeStatusCounts,
};
use shepherd_core::settings::DisciplerProspectRatio;
use shepherd_shared::AppError;
use tracing::debug;
use uuid::Uuid;

use super::active_questionnaire_ids;
use super::discipler::{self, DisciplerRepository};
use super::settings::SettingsRepository;
use crate::entities::{
    active_questionnaires, discipleship_follow_ups, discipleship_path_assignments,
    organisations, prospects, questionnaires, questions, responses,
    sea_orm_active_enums::{CompletionStatus, TraineeStatus},
    trainee_profiles, training_organisations, trainings,
};

/// Error types for reporting.
#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportingError> for AppError {
    fn from(err: ReportingError) -> Self {
        match err {
            ReportingError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Reporting repository.
#[derive(Debug, Clone)]
pub struct ReportingRepository {
    db: DatabaseConnection,
}

impl ReportingRepository {
    /// Creates a new reporting repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the home report.
    ///
    /// "New" counts are measured from `since`; follow-ups are due when their
    /// date is at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn home_report(
        &self,
        organisation: &organisations::Model,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<HomeReport, ReportingError> {
        let org_id = organisation.id;

        let total_prospects = prospects_of(org_id).count(&self.db).await?;
        let new_prospects = prospects_of(org_id)
            .filter(prospects::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;

        let active = active_questionnaires::Entity::find()
            .filter(active_questionnaires::Column::OrganisationId.eq(org_id))
            .filter(active_questionnaires::Column::IsActive.eq(true))
            .order_by_asc(active_questionnaires::Column::ActivatedAt)
            .find_also_related(questionnaires::Entity)
            .all(&self.db)
            .await?;

        let mut volumes = Vec::with_capacity(active.len());
        for questionnaire in active.into_iter().filter_map(|(_, q)| q) {
            let question_ids = question_ids(&self.db, vec![questionnaire.id]).await?;
            let total_responses = distinct_forms(&self.db, question_ids.clone(), None).await?;
            let new_responses = distinct_forms(&self.db, question_ids, Some(since)).await?;
            volumes.push(QuestionnaireVolume {
                questionnaire_id: questionnaire.id,
                name: questionnaire.name,
                title: questionnaire.title,
                total_responses,
                new_responses,
            });
        }

        let due_follow_ups = self.due_follow_ups(org_id, now).await?;

        debug!(organisation_id = %org_id, %since, "Home report built");

        Ok(HomeReport {
            organisation: summary(organisation),
            since,
            total_prospects,
            new_prospects,
            total_responses: volumes.iter().map(|v| v.total_responses).sum(),
            new_responses: volumes.iter().map(|v| v.new_responses).sum(),
            questionnaires: volumes,
            due_follow_ups,
        })
    }

    /// Follow-ups of the organisation's prospects due at `now`, most overdue
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn due_follow_ups(
        &self,
        organisation_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<DueFollowUp>, ReportingError> {
        let rows = discipleship_follow_ups::Entity::find()
            .find_also_related(prospects::Entity)
            .filter(prospects::Column::OrganisationId.eq(organisation_id))
            .filter(discipleship_follow_ups::Column::FollowUpDate.is_not_null())
            .filter(discipleship_follow_ups::Column::FollowUpDate.lte(now))
            .order_by_asc(discipleship_follow_ups::Column::FollowUpDate)
            .all(&self.db)
            .await?;

        let discipler_ids: Vec<Uuid> = rows.iter().map(|(f, _)| f.discipler_id).collect();
        let names = discipler::names_by_id(&self.db, discipler_ids).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(follow_up, prospect)| {
                let prospect = prospect?;
                let follow_up_date = follow_up.follow_up_date?.to_utc();
                Some(DueFollowUp {
                    id: follow_up.id,
                    prospect_id: prospect.id,
                    prospect_name: prospect.name,
                    discipler_id: follow_up.discipler_id,
                    discipler_name: names.get(&follow_up.discipler_id).cloned().unwrap_or_default(),
                    notes: follow_up.notes,
                    follow_up_date,
                })
            })
            .collect())
    }

    /// Builds the dashboard report.
    ///
    /// Day boundaries for the response series follow `tz`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn dashboard_report(
        &self,
        organisation: &organisations::Model,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> Result<DashboardReport, ReportingError> {
        let org_id = organisation.id;

        let total_prospects = prospects_of(org_id).count(&self.db).await?;
        let accepted = prospects_of(org_id)
            .filter(
                prospects::Column::ProspectFormId.in_subquery(
                    Query::select()
                        .column(responses::Column::ProspectFormId)
                        .from(responses::Entity)
                        .to_owned(),
                ),
            )
            .count(&self.db)
            .await?;
        let assigned = prospects_of(org_id)
            .filter(prospects::Column::DisciplerId.is_not_null())
            .count(&self.db)
            .await?;

        let discipleship = self.completion_counts(org_id).await?;

        let questionnaire_ids = active_questionnaire_ids(&self.db, org_id).await?;
        let series_question_ids = question_ids(&self.db, questionnaire_ids).await?;
        let windows = ReportingService::daily_windows(now, tz);
        let mut daily_counts = Vec::with_capacity(windows.len());
        for window in &windows {
            let count = responses::Entity::find()
                .filter(responses::Column::QuestionId.is_in(series_question_ids.clone()))
                .filter(responses::Column::SubmittedAt.gte(window.start))
                .filter(responses::Column::SubmittedAt.lt(window.end))
                .count(&self.db)
                .await?;
            daily_counts.push(count);
        }

        let total_disciplers = DisciplerRepository::new(self.db.clone())
            .count(org_id)
            .await?;
        let recommended = SettingsRepository::new(self.db.clone())
            .get::<DisciplerProspectRatio>()
            .await?;

        let trainings = self.training_completion(org_id).await?;

        let active_rows = active_questionnaires::Entity::find()
            .filter(active_questionnaires::Column::OrganisationId.eq(org_id))
            .filter(active_questionnaires::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;
        let mut total_questionnaire_responses = 0;
        for row in &active_rows {
            let ids = question_ids(&self.db, vec![row.questionnaire_id]).await?;
            total_questionnaire_responses += distinct_forms(&self.db, ids, None).await?;
        }
        let total_questionnaires = u64::try_from(active_rows.len()).unwrap_or(u64::MAX);

        debug!(organisation_id = %org_id, %tz, "Dashboard report built");

        Ok(DashboardReport {
            organisation: summary(organisation),
            acceptance: ReportingService::acceptance(accepted, total_prospects),
            assignment: ReportingService::assignment(assigned, total_prospects),
            discipleship: ReportingService::discipleship(discipleship),
            daily_responses: ReportingService::daily_series(&windows, &daily_counts),
            ratio: ReportingService::ratio(total_prospects, total_disciplers, recommended),
            trainings,
            avg_responses_per_questionnaire: ReportingService::average(
                total_questionnaire_responses,
                total_questionnaires,
            ),
            total_questionnaires,
        })
    }

    async fn completion_counts(&self, org_id: Uuid) -> Result<CompletionStatusCounts, DbErr> {
        let grouped: Vec<(CompletionStatus, i64)> = discipleship_path_assignments::Entity::find()
            .select_only()
            .column(discipleship_path_assignments::Column::CompletionStatus)
            .column_as(
                Expr::col(discipleship_path_assignments::Column::Id).count(),
                "count",
            )
            .filter(
                discipleship_path_assignments::Column::ProspectId.in_subquery(
                    Query::select()
                        .column(prospects::Column::Id)
                        .from(prospects::Entity)
                        .and_where(prospects::Column::OrganisationId.eq(org_id))
                        .to_owned(),
                ),
            )
            .group_by(discipleship_path_assignments::Column::CompletionStatus)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut counts = CompletionStatusCounts::default();
        for (status, n) in grouped {
            let n = u64::try_from(n).unwrap_or(0);
            match status {
                CompletionStatus::NotStarted => counts.not_started += n,
                CompletionStatus::InProgress => counts.in_progress += n,
                CompletionStatus::Stalled => counts.stalled += n,
                CompletionStatus::Completed => counts.completed += n,
            }
        }
        Ok(counts)
    }

    async fn training_completion(
        &self,
        org_id: Uuid,
    ) -> Result<Vec<shepherd_core::reporting::TrainingCompletion>, DbErr> {
        let training_ids: Vec<Uuid> = training_organisations::Entity::find()
            .select_only()
            .column(training_organisations::Column::TrainingId)
            .filter(training_organisations::Column::OrganisationId.eq(org_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let offered = trainings::Entity::find()
            .filter(trainings::Column::Id.is_in(training_ids))
            .order_by_asc(trainings::Column::Name)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(offered.len());
        for training in offered {
            let grouped: Vec<(TraineeStatus, i64)> = trainee_profiles::Entity::find()
                .select_only()
                .column(trainee_profiles::Column::Status)
                .column_as(Expr::col(trainee_profiles::Column::Id).count(), "count")
                .filter(trainee_profiles::Column::TrainingId.eq(training.id))
                .group_by(trainee_profiles::Column::Status)
                .into_tuple()
                .all(&self.db)
                .await?;

            let mut statuses = TraineeStatusCounts::default();
            for (status, n) in grouped {
                let n = u64::try_from(n).unwrap_or(0);
                match status {
                    TraineeStatus::Enrolled => statuses.enrolled += n,
                    TraineeStatus::InProgress => statuses.in_progress += n,
                    TraineeStatus::Stalled => statuses.stalled += n,
                    TraineeStatus::Completed => statuses.completed += n,
                    TraineeStatus::Dropped => statuses.dropped += n,
                }
            }

            result.push(ReportingService::training_completion(
                training.id,
                training.name,
                statuses,
            ));
        }
        Ok(result)
    }
}

fn summary(organisation: &organisations::Model) -> OrganisationSummary {
    OrganisationSummary {
        id: organisation.id,
        name: organisation.name.clone(),
    }
}

fn prospects_of(org_id: Uuid) -> sea_orm::Select<prospects::Entity> {
    prospects::Entity::find().filter(prospects::Column::OrganisationId.eq(org_id))
}

async fn question_ids<C: ConnectionTrait>(
    conn: &C,
    questionnaire_ids: Vec<Uuid>,
) -> Result<Vec<Uuid>, DbErr> {
    questions::Entity::find()
        .select_only()
        .column(questions::Column::Id)
        .filter(questions::Column::QuestionnaireId.is_in(questionnaire_ids))
        .into_tuple()
        .all(conn)
        .await
}

/// Distinct submissions among the given questions' responses.
async fn distinct_forms<C: ConnectionTrait>(
    conn: &C,
    question_ids: Vec<Uuid>,
    since: Option<DateTime<Utc>>,
) -> Result<u64, DbErr> {
    let mut query = responses::Entity::find()
        .select_only()
        .column(responses::Column::ProspectFormId)
        .filter(responses::Column::QuestionId.is_in(question_ids))
        .distinct();
    if let Some(since) = since {
        query = query.filter(responses::Column::SubmittedAt.gte(since));
    }
    query.count(conn).await
}
