//! Prospect, discipler and survey response list views.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use shepherd_core::listing::{DisciplerTab, ProspectTab, normalize_search};
use shepherd_core::reporting::OrganisationSummary;
use shepherd_db::{
    DisciplerListing, DisciplerRepository, ProspectListing, ProspectRepository, ResponseListing,
    ResponseRepository, entities::organisations,
};

use super::reports::{empty_report, resolve_organisation};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::Identity,
};

/// Creates the list view routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/prospects", get(prospects))
        .route("/disciplers", get(disciplers))
        .route("/survey-responses", get(survey_responses))
}

/// Query parameters shared by the list views.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Tab name; unknown values select "all".
    pub tab: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// 1-indexed page, as sent. Anything that is not a page number reads
    /// as the first page.
    pub page: Option<String>,
}

impl ListQuery {
    fn page(&self) -> Option<u32> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

/// A list view with the organisation it is scoped to.
#[derive(Debug, Serialize)]
pub struct Scoped<T> {
    /// Scope.
    pub organisation: OrganisationSummary,
    /// The view.
    #[serde(flatten)]
    pub view: T,
}

fn scoped<T: Serialize>(organisation: &organisations::Model, view: T) -> Response {
    Json(Scoped {
        organisation: OrganisationSummary {
            id: organisation.id,
            name: organisation.name.clone(),
        },
        view,
    })
    .into_response()
}

/// GET /prospects - Prospects with tab counts and assignable disciplers.
async fn prospects(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> ApiResult<Response> {
    let Some(organisation) = resolve_organisation(&state, &identity).await? else {
        return Ok(empty_report());
    };

    let listing: ProspectListing = ProspectRepository::new((*state.db).clone())
        .list(
            organisation.id,
            ProspectTab::from_query(query.tab.as_deref()),
            normalize_search(query.search.as_deref()),
            query.page(),
        )
        .await
        .map_err(|e| ApiError::database(&e))?;

    Ok(scoped(&organisation, listing))
}

/// GET /disciplers - Disciplers with tab counts and unassigned prospects.
async fn disciplers(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> ApiResult<Response> {
    let Some(organisation) = resolve_organisation(&state, &identity).await? else {
        return Ok(empty_report());
    };

    let listing: DisciplerListing = DisciplerRepository::new((*state.db).clone())
        .list(
            organisation.id,
            DisciplerTab::from_query(query.tab.as_deref()),
            normalize_search(query.search.as_deref()),
            query.page(),
        )
        .await
        .map_err(|e| ApiError::database(&e))?;

    Ok(scoped(&organisation, listing))
}

/// GET /survey-responses - Responses of the active questionnaires.
async fn survey_responses(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> ApiResult<Response> {
    let Some(organisation) = resolve_organisation(&state, &identity).await? else {
        return Ok(empty_report());
    };

    let listing: ResponseListing = ResponseRepository::new((*state.db).clone())
        .list(
            organisation.id,
            normalize_search(query.search.as_deref()),
            query.page(),
        )
        .await
        .map_err(|e| ApiError::database(&e))?;

    Ok(scoped(&organisation, listing))
}
