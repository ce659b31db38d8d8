//! Prospect repository: joining from the funnel and the prospect list view.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use shepherd_core::funnel::{FormId, FunnelAction};
use shepherd_core::listing::{PROSPECTS_PER_PAGE, ProspectTab};
use shepherd_shared::AppError;
use shepherd_shared::types::{PageRequest, PageResponse};
use tracing::{info, warn};
use uuid::Uuid;

use super::discipler::{self, DisciplerOption};
use super::{contains_ci, funnel, is_unique_violation};
use crate::entities::{active_questionnaires, prospects, questions, responses};

/// Error types for prospect operations.
#[derive(Debug, thiserror::Error)]
pub enum ProspectError {
    /// A prospect already exists for this email or form id.
    #[error("A prospect with this {0} already exists")]
    Conflict(&'static str),

    /// Name or email missing.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// No organisation to attach the prospect to.
    #[error("No organisation available")]
    NoOrganisation,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProspectError> for AppError {
    fn from(err: ProspectError) -> Self {
        match err {
            ProspectError::Conflict(_) => Self::Conflict(err.to_string()),
            ProspectError::MissingField(_) => Self::BadRequest(err.to_string()),
            ProspectError::NoOrganisation => Self::Unavailable(err.to_string()),
            ProspectError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Details posted on the join form.
///
/// Absent fields deserialize as empty and are rejected by
/// [`ProspectRepository::complete_join`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JoinDetails {
    /// Full name.
    pub name: String,
    /// Email, unique across prospects.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// One prospect in the list view.
#[derive(Debug, Clone, Serialize)]
pub struct ProspectRow {
    /// Prospect ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Funnel correlation key.
    pub prospect_form_id: String,
    /// Assigned discipler.
    pub discipler_id: Option<Uuid>,
    /// Assigned discipler's name.
    pub discipler_name: Option<String>,
    /// When the prospect joined.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Tab counts for the prospect list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProspectTabCounts {
    /// Every prospect.
    pub all: u64,
    /// With a discipler.
    pub assigned: u64,
    /// Without one.
    pub unassigned: u64,
}

/// Prospect list view.
#[derive(Debug, Clone, Serialize)]
pub struct ProspectListing {
    /// Selected tab.
    pub tab: ProspectTab,
    /// Applied search.
    pub search: Option<String>,
    /// Current page.
    pub prospects: PageResponse<ProspectRow>,
    /// Counts per tab, ignoring the search.
    pub counts: ProspectTabCounts,
    /// Disciplers available for assignment.
    pub disciplers: Vec<DisciplerOption>,
}

/// Prospect repository.
#[derive(Debug, Clone)]
pub struct ProspectRepository {
    db: DatabaseConnection,
}

impl ProspectRepository {
    /// Creates a new prospect repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a prospect by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<prospects::Model>, DbErr> {
        prospects::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds the prospect created from a form.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_form_id(&self, form_id: &FormId) -> Result<Option<prospects::Model>, DbErr> {
        prospects::Entity::find()
            .filter(prospects::Column::ProspectFormId.eq(form_id.as_str()))
            .one(&self.db)
            .await
    }

    /// Counts prospects created from a form. Never more than one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_for_form(&self, form_id: &FormId) -> Result<u64, DbErr> {
        prospects::Entity::find()
            .filter(prospects::Column::ProspectFormId.eq(form_id.as_str()))
            .count(&self.db)
            .await
    }

    /// Organisation a form was answered for: the organisation that has the
    /// questionnaire active, oldest activation first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn organisation_for_form(&self, form_id: &FormId) -> Result<Option<Uuid>, DbErr> {
        organisation_for_form(&self.db, form_id).await
    }

    /// Completes the join step: logs `prospect_signed_up` and creates the
    /// prospect in one transaction.
    ///
    /// The organisation comes from the questionnaire the form answered,
    /// else from `fallback_organisation`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when a prospect already exists for the email or
    /// form id; nothing is written in that case.
    pub async fn complete_join(
        &self,
        form_id: &FormId,
        details: JoinDetails,
        fallback_organisation: Option<Uuid>,
    ) -> Result<prospects::Model, ProspectError> {
        let name = details.name.trim().to_string();
        let email = details.email.trim().to_string();
        if name.is_empty() {
            return Err(ProspectError::MissingField("Name"));
        }
        if email.is_empty() {
            return Err(ProspectError::MissingField("Email"));
        }
        let phone_number = details
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let organisation_id = match self.organisation_for_form(form_id).await? {
            Some(id) => id,
            None => fallback_organisation.ok_or(ProspectError::NoOrganisation)?,
        };

        let txn = self.db.begin().await?;

        let existing = prospects::Entity::find()
            .filter(
                Condition::any()
                    .add(prospects::Column::Email.eq(email.as_str()))
                    .add(prospects::Column::ProspectFormId.eq(form_id.as_str())),
            )
            .one(&txn)
            .await?;
        if let Some(existing) = existing {
            txn.rollback().await?;
            let field = if existing.email == email { "email" } else { "form id" };
            warn!(form_id = %form_id, field, "Prospect already exists");
            return Err(ProspectError::Conflict(field));
        }

        funnel::append(&txn, form_id, FunnelAction::ProspectSignedUp).await?;

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let model = prospects::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            phone_number: Set(phone_number),
            prospect_form_id: Set(form_id.as_str().to_string()),
            organisation_id: Set(organisation_id),
            discipler_id: Set(None),
            joined_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let prospect = match insert_prospect(&txn, model).await {
            Ok(prospect) => prospect,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        txn.commit().await?;

        info!(
            prospect_id = %prospect.id,
            form_id = %form_id,
            %organisation_id,
            "Prospect created"
        );

        Ok(prospect)
    }

    /// Lists prospects for the list view.
    ///
    /// Newest first, 15 per page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organisation_id: Uuid,
        tab: ProspectTab,
        search: Option<String>,
        page: Option<u32>,
    ) -> Result<ProspectListing, DbErr> {
        let page = PageRequest::new(page, PROSPECTS_PER_PAGE);
        let counts = self.counts(organisation_id).await?;

        let mut query = for_organisation(organisation_id);
        query = match tab {
            ProspectTab::All => query,
            ProspectTab::Assigned => query.filter(prospects::Column::DisciplerId.is_not_null()),
            ProspectTab::Unassigned => query.filter(prospects::Column::DisciplerId.is_null()),
        };
        if let Some(q) = &search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci::<prospects::Entity>(prospects::Column::Name, q))
                    .add(contains_ci::<prospects::Entity>(prospects::Column::Email, q))
                    .add(contains_ci::<prospects::Entity>(prospects::Column::PhoneNumber, q))
                    .add(contains_ci::<prospects::Entity>(
                        prospects::Column::ProspectFormId,
                        q,
                    )),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(prospects::Column::CreatedAt)
            .order_by_desc(prospects::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let discipler_ids: Vec<Uuid> = models.iter().filter_map(|p| p.discipler_id).collect();
        let names = discipler::names_by_id(&self.db, discipler_ids).await?;

        let rows = models
            .into_iter()
            .map(|p| ProspectRow {
                discipler_name: p.discipler_id.and_then(|id| names.get(&id).cloned()),
                id: p.id,
                name: p.name,
                email: p.email,
                phone_number: p.phone_number,
                prospect_form_id: p.prospect_form_id,
                discipler_id: p.discipler_id,
                created_at: p.created_at.to_utc(),
            })
            .collect();

        let disciplers = discipler::DisciplerRepository::new(self.db.clone())
            .options(organisation_id)
            .await?;

        Ok(ProspectListing {
            tab,
            search,
            prospects: PageResponse::new(rows, page.page, page.per_page, total),
            counts,
            disciplers,
        })
    }

    /// Tab counts for an organisation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn counts(&self, organisation_id: Uuid) -> Result<ProspectTabCounts, DbErr> {
        let all = for_organisation(organisation_id).count(&self.db).await?;
        let assigned = for_organisation(organisation_id)
            .filter(prospects::Column::DisciplerId.is_not_null())
            .count(&self.db)
            .await?;

        Ok(ProspectTabCounts {
            all,
            assigned,
            unassigned: all.saturating_sub(assigned),
        })
    }
}

fn for_organisation(organisation_id: Uuid) -> Select<prospects::Entity> {
    prospects::Entity::find().filter(prospects::Column::OrganisationId.eq(organisation_id))
}

/// Inserts a prospect row.
///
/// The unique indexes on email and form id catch a prospect created by a
/// concurrent join after the existence check.
async fn insert_prospect<C: ConnectionTrait>(
    conn: &C,
    model: prospects::ActiveModel,
) -> Result<prospects::Model, ProspectError> {
    match model.insert(conn).await {
        Ok(prospect) => Ok(prospect),
        Err(e) if is_unique_violation(&e) => {
            warn!("Concurrent prospect creation rejected");
            Err(ProspectError::Conflict("email or form id"))
        }
        Err(e) => Err(e.into()),
    }
}

async fn organisation_for_form<C: ConnectionTrait>(
    conn: &C,
    form_id: &FormId,
) -> Result<Option<Uuid>, DbErr> {
    let question_ids: Vec<Uuid> = responses::Entity::find()
        .select_only()
        .column(responses::Column::QuestionId)
        .filter(responses::Column::ProspectFormId.eq(form_id.as_str()))
        .into_tuple()
        .all(conn)
        .await?;
    if question_ids.is_empty() {
        return Ok(None);
    }

    let questionnaire_ids: Vec<Uuid> = questions::Entity::find()
        .select_only()
        .column(questions::Column::QuestionnaireId)
        .filter(questions::Column::Id.is_in(question_ids))
        .distinct()
        .into_tuple()
        .all(conn)
        .await?;

    active_questionnaires::Entity::find()
        .select_only()
        .column(active_questionnaires::Column::OrganisationId)
        .filter(active_questionnaires::Column::QuestionnaireId.is_in(questionnaire_ids))
        .filter(active_questionnaires::Column::IsActive.eq(true))
        .order_by_asc(active_questionnaires::Column::ActivatedAt)
        .into_tuple()
        .one(conn)
        .await
}
