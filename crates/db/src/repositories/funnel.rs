//! Funnel event log repository.
//!
//! Rows are only ever appended. A form's state is derived from whatever rows
//! exist for its id.

use std::str::FromStr;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use shepherd_core::funnel::{
    FormId, FunnelAction, FunnelEvent, FunnelState, derive_funnel_state,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::questionnaire_logs;

/// Funnel event log repository.
#[derive(Debug, Clone)]
pub struct FunnelRepository {
    db: DatabaseConnection,
}

impl FunnelRepository {
    /// Creates a new funnel repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one event for a form.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record(
        &self,
        form_id: &FormId,
        action: FunnelAction,
    ) -> Result<questionnaire_logs::Model, DbErr> {
        append(&self.db, form_id, action).await
    }

    /// Logs that the join form was shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn begin_join(&self, form_id: &FormId) -> Result<questionnaire_logs::Model, DbErr> {
        self.record(form_id, FunnelAction::ProspectSigningUp).await
    }

    /// Logs that the visitor declined to join.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn decline(&self, form_id: &FormId) -> Result<questionnaire_logs::Model, DbErr> {
        self.record(form_id, FunnelAction::ProspectDeclined).await
    }

    /// Logs that the visitor chose self-study.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn choose_self_study(
        &self,
        form_id: &FormId,
    ) -> Result<questionnaire_logs::Model, DbErr> {
        self.record(form_id, FunnelAction::ProspectSelfStudySignup).await
    }

    /// Logs that the visitor reached the final success page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn mark_final_success(
        &self,
        form_id: &FormId,
    ) -> Result<questionnaire_logs::Model, DbErr> {
        self.record(form_id, FunnelAction::ProspectFinalSuccess).await
    }

    /// Returns whether an action has been logged for a form.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn has_action(&self, form_id: &FormId, action: FunnelAction) -> Result<bool, DbErr> {
        has_action(&self.db, form_id, action).await
    }

    /// Counts rows logged for a form, optionally for one action only.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(
        &self,
        form_id: &FormId,
        action: Option<FunnelAction>,
    ) -> Result<u64, DbErr> {
        let mut query = questionnaire_logs::Entity::find()
            .filter(questionnaire_logs::Column::FormId.eq(form_id.as_str()));
        if let Some(action) = action {
            query = query.filter(questionnaire_logs::Column::Action.eq(action.as_str()));
        }
        query.count(&self.db).await
    }

    /// Loads every event for a form, oldest first.
    ///
    /// Rows whose action is outside the funnel vocabulary are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn events_for_form(&self, form_id: &FormId) -> Result<Vec<FunnelEvent>, DbErr> {
        let rows = questionnaire_logs::Entity::find()
            .filter(questionnaire_logs::Column::FormId.eq(form_id.as_str()))
            .order_by_asc(questionnaire_logs::Column::Timestamp)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match FunnelAction::from_str(&row.action) {
                Ok(action) => Some(FunnelEvent::new(action, row.timestamp.to_utc())),
                Err(e) => {
                    warn!(form_id = %row.form_id, error = %e, "Skipping unknown funnel action");
                    None
                }
            })
            .collect())
    }

    /// Derives the current funnel state for a form.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn state_for_form(&self, form_id: &FormId) -> Result<FunnelState, DbErr> {
        let events = self.events_for_form(form_id).await?;
        Ok(derive_funnel_state(&events))
    }
}

/// Appends one event on any connection, including an open transaction.
pub(crate) async fn append<C: ConnectionTrait>(
    conn: &C,
    form_id: &FormId,
    action: FunnelAction,
) -> Result<questionnaire_logs::Model, DbErr> {
    let row = questionnaire_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        form_id: Set(form_id.as_str().to_string()),
        action: Set(action.as_str().to_string()),
        timestamp: Set(chrono::Utc::now().into()),
    }
    .insert(conn)
    .await?;

    info!(form_id = %form_id, action = %action, "Funnel event recorded");
    Ok(row)
}

/// Checks for an action on any connection, including an open transaction.
pub(crate) async fn has_action<C: ConnectionTrait>(
    conn: &C,
    form_id: &FormId,
    action: FunnelAction,
) -> Result<bool, DbErr> {
    let count = questionnaire_logs::Entity::find()
        .filter(questionnaire_logs::Column::FormId.eq(form_id.as_str()))
        .filter(questionnaire_logs::Column::Action.eq(action.as_str()))
        .count(conn)
        .await?;

    Ok(count > 0)
}
