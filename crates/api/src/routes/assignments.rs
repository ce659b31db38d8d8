//! Assignment endpoints.
//!
//! The prospect list and the discipler list each post here; both accept a
//! form-encoded or JSON body and answer `{success, message}`.

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    routing::post,
};
use serde::{Deserialize, Serialize};
use shepherd_db::AssignmentRepository;
use uuid::Uuid;

use crate::{AppState, error::AssignError};

/// Creates the assignment routes.
///
/// Methods other than POST are answered with "Invalid request".
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/assign-prospect",
            post(assign_prospect).fallback(invalid_request),
        )
        .route(
            "/api/assign-prospect-to-discipler",
            post(assign_prospect_to_discipler).fallback(invalid_request),
        )
}

/// Assignment request body.
#[derive(Debug, Default, Deserialize)]
pub struct AssignRequest {
    /// Prospect to assign.
    pub prospect_id: Option<String>,
    /// Discipler to assign to.
    pub discipler_id: Option<String>,
}

impl AssignRequest {
    fn ids(&self) -> Result<(Uuid, Uuid), AssignError> {
        let parse = |raw: Option<&String>| {
            raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
                .ok_or_else(AssignError::invalid_request)
        };
        Ok((
            parse(self.prospect_id.as_ref())?,
            parse(self.discipler_id.as_ref())?,
        ))
    }
}

/// Successful assignment.
#[derive(Debug, Serialize)]
pub struct AssignResponse {
    /// Always true.
    pub success: bool,
    /// "{prospect} assigned to {first} {last}".
    pub message: String,
}

/// Assignment body, form-encoded or JSON depending on the content type.
#[derive(Debug)]
pub struct AssignBody(pub AssignRequest);

impl<S> FromRequest<S> for AssignBody
where
    S: Send + Sync,
{
    type Rejection = AssignError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        let body = if is_json {
            Json::<AssignRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|_| AssignError::invalid_request())?
        } else {
            Form::<AssignRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|_| AssignError::invalid_request())?
        };

        Ok(Self(body))
    }
}

async fn assign(
    state: &AppState,
    body: &AssignRequest,
) -> Result<Json<AssignResponse>, AssignError> {
    let (prospect_id, discipler_id) = body.ids()?;
    let message = AssignmentRepository::new((*state.db).clone())
        .assign(prospect_id, discipler_id)
        .await?;

    Ok(Json(AssignResponse {
        success: true,
        message,
    }))
}

/// POST /api/assign-prospect - Assign from the prospect list.
async fn assign_prospect(
    State(state): State<AppState>,
    AssignBody(body): AssignBody,
) -> Result<Json<AssignResponse>, AssignError> {
    assign(&state, &body).await
}

/// POST /api/assign-prospect-to-discipler - Assign from the discipler list.
async fn assign_prospect_to_discipler(
    State(state): State<AppState>,
    AssignBody(body): AssignBody,
) -> Result<Json<AssignResponse>, AssignError> {
    assign(&state, &body).await
}

async fn invalid_request() -> AssignError {
    AssignError::invalid_request()
}
