//! Assigns prospects to disciplers.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Set,
};
use shepherd_shared::AppError;
use tracing::info;
use uuid::Uuid;

use super::discipler::display_name;
use crate::entities::{app_users, discipler_profiles, prospects, users};

/// Error types for assignment.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    /// Prospect not found.
    #[error("Prospect not found")]
    ProspectNotFound(Uuid),

    /// Discipler not found.
    #[error("Discipler not found")]
    DisciplerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AssignmentError> for AppError {
    fn from(err: AssignmentError) -> Self {
        match err {
            AssignmentError::ProspectNotFound(_) | AssignmentError::DisciplerNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            AssignmentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Assignment repository.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    /// Creates a new assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Points a prospect at a discipler, replacing any previous one.
    ///
    /// Returns `"{prospect} assigned to {first} {last}"`. Repeating the call
    /// changes nothing and returns the same message.
    ///
    /// # Errors
    ///
    /// Returns `ProspectNotFound` or `DisciplerNotFound` when either id does
    /// not resolve.
    pub async fn assign(
        &self,
        prospect_id: Uuid,
        discipler_id: Uuid,
    ) -> Result<String, AssignmentError> {
        let prospect = prospects::Entity::find_by_id(prospect_id)
            .one(&self.db)
            .await?
            .ok_or(AssignmentError::ProspectNotFound(prospect_id))?;

        let discipler = discipler_profiles::Entity::find_by_id(discipler_id)
            .one(&self.db)
            .await?
            .ok_or(AssignmentError::DisciplerNotFound(discipler_id))?;

        let account = app_users::Entity::find_by_id(discipler.app_user_id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?
            .and_then(|(_, user)| user)
            .ok_or(AssignmentError::DisciplerNotFound(discipler_id))?;

        let prospect_name = prospect.name.clone();
        if prospect.discipler_id != Some(discipler_id) {
            let mut active = prospect.into_active_model();
            active.discipler_id = Set(Some(discipler_id));
            active.updated_at = Set(chrono::Utc::now().into());
            active.update(&self.db).await?;
        }

        let message = format!(
            "{prospect_name} assigned to {}",
            display_name(&account.first_name, &account.last_name)
        );
        info!(%prospect_id, %discipler_id, "Prospect assigned");

        Ok(message)
    }
}
