//! Home and dashboard reports.
//!
//! Both are scoped to the organisation resolved for the caller. Without one
//! they answer an empty report (`{"organisation": null}`).

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{DateTime, Utc};
use serde_json::json;
use shepherd_core::reporting::ReportingService;
use shepherd_db::{ReportingRepository, entities::organisations};
use tracing::debug;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::Identity,
};

/// Cookie holding the home report watermark.
pub const LAST_VISIT_COOKIE: &str = "last_visit";

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/dashboard", get(dashboard))
}

/// Resolves the organisation the caller's reports are scoped to.
pub(crate) async fn resolve_organisation(
    state: &AppState,
    identity: &Identity,
) -> ApiResult<Option<organisations::Model>> {
    state
        .resolver()
        .resolve(identity.context())
        .await
        .map_err(|e| ApiError::database(&e))
}

/// Report answered when no organisation could be resolved.
pub(crate) fn empty_report() -> Response {
    Json(json!({ "organisation": null })).into_response()
}

fn last_visit(jar: &CookieJar) -> Option<DateTime<Utc>> {
    jar.get(LAST_VISIT_COOKIE)
        .and_then(|c| DateTime::parse_from_rfc3339(c.value()).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// GET /home - Volumes since the last visit and due follow-ups.
///
/// The watermark is read from and then advanced in the `last_visit` cookie.
async fn home(
    State(state): State<AppState>,
    identity: Identity,
    jar: CookieJar,
) -> ApiResult<Response> {
    let Some(organisation) = resolve_organisation(&state, &identity).await? else {
        return Ok(empty_report());
    };

    let now = Utc::now();
    let since =
        ReportingService::resolve_since(last_visit(&jar), now, state.reporting.lookback_days);
    debug!(%since, "Home report watermark");

    let report = ReportingRepository::new((*state.db).clone())
        .home_report(&organisation, since, now)
        .await?;

    let cookie = Cookie::build((LAST_VISIT_COOKIE, now.to_rfc3339()))
        .path("/")
        .http_only(true);

    Ok((jar.add(cookie), Json(report)).into_response())
}

/// GET /dashboard - Funnel rates, time series and discipler load.
async fn dashboard(State(state): State<AppState>, identity: Identity) -> ApiResult<Response> {
    let Some(organisation) = resolve_organisation(&state, &identity).await? else {
        return Ok(empty_report());
    };

    let report = ReportingRepository::new((*state.db).clone())
        .dashboard_report(&organisation, Utc::now(), state.reporting.timezone)
        .await?;

    Ok(Json(report).into_response())
}
