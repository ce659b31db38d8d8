//! Discipler list views.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
    sea_query::{Expr, Query, SelectStatement},
};
use serde::Serialize;
use shepherd_core::listing::{DISCIPLERS_PER_PAGE, DisciplerTab};
use shepherd_shared::types::{PageRequest, PageResponse};
use uuid::Uuid;

use super::contains_ci;
use crate::entities::{app_users, discipler_profiles, discipler_trainings, prospects, users};

/// Discipler joined with the account it belongs to.
#[derive(Debug, Clone, FromQueryResult)]
struct DisciplerRecord {
    id: Uuid,
    app_user_id: Uuid,
    bio: Option<String>,
    first_name: String,
    last_name: String,
    email: String,
}

/// One discipler in the list view.
#[derive(Debug, Clone, Serialize)]
pub struct DisciplerRow {
    /// Discipler profile ID.
    pub id: Uuid,
    /// Application user ID.
    pub app_user_id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Bio.
    pub bio: Option<String>,
    /// Completed trainings.
    pub trainings_completed: u64,
    /// Prospects currently assigned.
    pub prospect_count: u64,
}

/// A discipler offered in the assign dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisciplerOption {
    /// Discipler profile ID.
    pub id: Uuid,
    /// "First Last".
    pub name: String,
}

/// A prospect offered in the assign modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct UnassignedProspect {
    /// Prospect ID.
    pub id: Uuid,
    /// Prospect name.
    pub name: String,
    /// Prospect email.
    pub email: String,
}

/// Tab counts for the discipler list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DisciplerTabCounts {
    /// Every discipler.
    pub all: u64,
    /// With at least one completed training.
    pub trained: u64,
    /// Without.
    pub not_trained: u64,
}

/// Discipler list view.
#[derive(Debug, Clone, Serialize)]
pub struct DisciplerListing {
    /// Selected tab.
    pub tab: DisciplerTab,
    /// Applied search.
    pub search: Option<String>,
    /// Current page.
    pub disciplers: PageResponse<DisciplerRow>,
    /// Counts per tab, ignoring the search.
    pub counts: DisciplerTabCounts,
    /// Prospects without a discipler, by name.
    pub unassigned_prospects: Vec<UnassignedProspect>,
}

/// Discipler repository.
#[derive(Debug, Clone)]
pub struct DisciplerRepository {
    db: DatabaseConnection,
}

impl DisciplerRepository {
    /// Creates a new discipler repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Counts the organisation's disciplers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self, organisation_id: Uuid) -> Result<u64, DbErr> {
        for_organisation(organisation_id).count(&self.db).await
    }

    /// Lists disciplers for the list view.
    ///
    /// Ordered by last then first name, 15 per page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organisation_id: Uuid,
        tab: DisciplerTab,
        search: Option<String>,
        page: Option<u32>,
    ) -> Result<DisciplerListing, DbErr> {
        let page = PageRequest::new(page, DISCIPLERS_PER_PAGE);

        let all = for_organisation(organisation_id).count(&self.db).await?;
        let trained = for_organisation(organisation_id)
            .filter(discipler_profiles::Column::Id.in_subquery(trained_in(organisation_id)))
            .count(&self.db)
            .await?;
        let counts = DisciplerTabCounts {
            all,
            trained,
            not_trained: all.saturating_sub(trained),
        };

        let mut query = for_organisation(organisation_id);
        query = match tab {
            DisciplerTab::All => query,
            DisciplerTab::Trained => query
                .filter(discipler_profiles::Column::Id.in_subquery(trained_in(organisation_id))),
            DisciplerTab::NotTrained => query.filter(
                discipler_profiles::Column::Id.not_in_subquery(trained_in(organisation_id)),
            ),
        };
        if let Some(q) = &search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci::<users::Entity>(users::Column::FirstName, q))
                    .add(contains_ci::<users::Entity>(users::Column::LastName, q))
                    .add(contains_ci::<users::Entity>(users::Column::Email, q))
                    .add(contains_ci::<discipler_profiles::Entity>(
                        discipler_profiles::Column::Bio,
                        q,
                    )),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let records = with_account_columns(query)
            .offset(page.offset())
            .limit(page.limit())
            .into_model::<DisciplerRecord>()
            .all(&self.db)
            .await?;

        let page_ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let trainings = completed_trainings(&self.db, page_ids.clone()).await?;
        let prospect_counts = prospect_counts(&self.db, page_ids).await?;

        let rows = records
            .into_iter()
            .map(|r| DisciplerRow {
                trainings_completed: trainings.get(&r.id).copied().unwrap_or(0),
                prospect_count: prospect_counts.get(&r.id).copied().unwrap_or(0),
                id: r.id,
                app_user_id: r.app_user_id,
                first_name: r.first_name,
                last_name: r.last_name,
                email: r.email,
                bio: r.bio,
            })
            .collect();

        let unassigned_prospects = prospects::Entity::find()
            .select_only()
            .column(prospects::Column::Id)
            .column(prospects::Column::Name)
            .column(prospects::Column::Email)
            .filter(prospects::Column::OrganisationId.eq(organisation_id))
            .filter(prospects::Column::DisciplerId.is_null())
            .order_by_asc(prospects::Column::Name)
            .into_model::<UnassignedProspect>()
            .all(&self.db)
            .await?;

        Ok(DisciplerListing {
            tab,
            search,
            disciplers: PageResponse::new(rows, page.page, page.per_page, total),
            counts,
            unassigned_prospects,
        })
    }

    /// Lists every discipler of the organisation for the assign dropdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn options(&self, organisation_id: Uuid) -> Result<Vec<DisciplerOption>, DbErr> {
        let records = with_account_columns(for_organisation(organisation_id))
            .into_model::<DisciplerRecord>()
            .all(&self.db)
            .await?;

        Ok(records
            .into_iter()
            .map(|r| DisciplerOption {
                id: r.id,
                name: display_name(&r.first_name, &r.last_name),
            })
            .collect())
    }
}

/// "First Last", as shown next to prospects and in assignment messages.
pub(crate) fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

/// Display names for the given discipler profiles.
pub(crate) async fn names_by_id<C: ConnectionTrait>(
    conn: &C,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let records = with_account_columns(
        discipler_profiles::Entity::find()
            .join(JoinType::InnerJoin, discipler_profiles::Relation::AppUsers.def())
            .join(JoinType::InnerJoin, app_users::Relation::Users.def())
            .filter(discipler_profiles::Column::Id.is_in(ids)),
    )
    .into_model::<DisciplerRecord>()
    .all(conn)
    .await?;

    Ok(records
        .into_iter()
        .map(|r| (r.id, display_name(&r.first_name, &r.last_name)))
        .collect())
}

/// Disciplers of one organisation, joined to their accounts.
fn for_organisation(organisation_id: Uuid) -> Select<discipler_profiles::Entity> {
    discipler_profiles::Entity::find()
        .join(JoinType::InnerJoin, discipler_profiles::Relation::AppUsers.def())
        .join(JoinType::InnerJoin, app_users::Relation::Users.def())
        .filter(app_users::Column::OrganisationId.eq(organisation_id))
}

fn with_account_columns(query: Select<discipler_profiles::Entity>) -> Select<discipler_profiles::Entity> {
    query
        .select_only()
        .column(discipler_profiles::Column::Id)
        .column(discipler_profiles::Column::AppUserId)
        .column(discipler_profiles::Column::Bio)
        .column(users::Column::FirstName)
        .column(users::Column::LastName)
        .column(users::Column::Email)
        .order_by_asc(users::Column::LastName)
        .order_by_asc(users::Column::FirstName)
}

/// Disciplers of the organisation with at least one completed training.
fn trained_in(organisation_id: Uuid) -> SelectStatement {
    Query::select()
        .column((discipler_trainings::Entity, discipler_trainings::Column::DisciplerId))
        .from(discipler_trainings::Entity)
        .inner_join(
            discipler_profiles::Entity,
            Expr::col((discipler_profiles::Entity, discipler_profiles::Column::Id))
                .equals((discipler_trainings::Entity, discipler_trainings::Column::DisciplerId)),
        )
        .inner_join(
            app_users::Entity,
            Expr::col((app_users::Entity, app_users::Column::Id))
                .equals((discipler_profiles::Entity, discipler_profiles::Column::AppUserId)),
        )
        .and_where(
            Expr::col((app_users::Entity, app_users::Column::OrganisationId)).eq(organisation_id),
        )
        .to_owned()
}

/// Completed trainings per discipler, for one page of disciplers.
async fn completed_trainings<C: ConnectionTrait>(
    conn: &C,
    discipler_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, u64>, DbErr> {
    if discipler_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let grouped: Vec<(Uuid, i64)> = discipler_trainings::Entity::find()
        .select_only()
        .column(discipler_trainings::Column::DisciplerId)
        .column_as(Expr::col(discipler_trainings::Column::TrainingId).count(), "count")
        .filter(discipler_trainings::Column::DisciplerId.is_in(discipler_ids))
        .group_by(discipler_trainings::Column::DisciplerId)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(grouped
        .into_iter()
        .map(|(id, count)| (id, u64::try_from(count).unwrap_or(0)))
        .collect())
}

/// Assigned prospects per discipler.
async fn prospect_counts<C: ConnectionTrait>(
    conn: &C,
    discipler_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, u64>, DbErr> {
    if discipler_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let assigned: Vec<Option<Uuid>> = prospects::Entity::find()
        .select_only()
        .column(prospects::Column::DisciplerId)
        .filter(prospects::Column::DisciplerId.is_in(discipler_ids))
        .into_tuple()
        .all(conn)
        .await?;

    let mut counts = HashMap::new();
    for id in assigned.into_iter().flatten() {
        *counts.entry(id).or_insert(0) += 1;
    }
    Ok(counts)
}
