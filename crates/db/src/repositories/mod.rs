//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod assignment;
pub mod discipler;
pub mod funnel;
pub mod organisation;
pub mod prospect;
pub mod questionnaire;
pub mod reporting;
pub mod response;
pub mod settings;

pub use assignment::{AssignmentError, AssignmentRepository};
pub use discipler::{
    DisciplerListing, DisciplerOption, DisciplerRepository, DisciplerRow, DisciplerTabCounts,
    UnassignedProspect,
};
pub use funnel::FunnelRepository;
pub use organisation::{OrganisationRepository, OrganisationResolver};
pub use prospect::{
    JoinDetails, ProspectError, ProspectListing, ProspectRepository, ProspectRow,
    ProspectTabCounts,
};
pub use questionnaire::{
    OpenedForm, QuestionWithOptions, QuestionnaireRepository, RecorderError, SubmitOutcome,
};
pub use reporting::{ReportingError, ReportingRepository};
pub use response::{ResponseListing, ResponseRepository, ResponseRow};
pub use settings::SettingsRepository;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect, SqlErr,
    sea_query::{Expr, Func, SimpleExpr},
};
use uuid::Uuid;

use crate::entities::active_questionnaires;

/// Whether a database error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Case-insensitive substring match on a column.
pub(crate) fn contains_ci<E: EntityTrait>(column: E::Column, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((E::default(), column))))
        .like(format!("%{}%", needle.to_lowercase()))
}

/// Questionnaires the organisation currently has active.
pub(crate) async fn active_questionnaire_ids<C: ConnectionTrait>(
    conn: &C,
    organisation_id: Uuid,
) -> Result<Vec<Uuid>, DbErr> {
    active_questionnaires::Entity::find()
        .select_only()
        .column(active_questionnaires::Column::QuestionnaireId)
        .filter(active_questionnaires::Column::OrganisationId.eq(organisation_id))
        .filter(active_questionnaires::Column::IsActive.eq(true))
        .distinct()
        .into_tuple()
        .all(conn)
        .await
}
