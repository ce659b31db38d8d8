//! Questionnaire and funnel routes for visitors.
//!
//! A visitor opens a questionnaire, submits it, and then picks one of the
//! follow-up steps. Every step is logged against the form id issued when
//! the questionnaire was opened.

use std::collections::HashMap;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use shepherd_core::funnel::{FormId, FunnelAction};
use shepherd_db::{
    FunnelRepository, JoinDetails, OpenedForm, ProspectRepository, QuestionnaireRepository,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::Identity,
};

/// Creates the form routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forms/{questionnaire_id}", get(open_form))
        .route(
            "/forms/{questionnaire_id}/submit",
            axum::routing::post(submit_form),
        )
        .route(
            "/forms/prospect/{form_id}/join",
            get(begin_join).post(complete_join),
        )
        .route("/forms/prospect/{form_id}/no-join", get(decline))
        .route("/forms/prospect/{form_id}/self-study", get(self_study))
        .route("/forms/prospect/{form_id}/final-success", get(final_success))
}

/// Answer field prefix on the submitted form.
const QUESTION_FIELD_PREFIX: &str = "question_";

/// Confirmation of a recorded funnel step.
#[derive(Debug, Serialize)]
pub struct StepResponse {
    /// Form the step was recorded for.
    pub form_id: FormId,
    /// Recorded action.
    pub action: FunnelAction,
}

/// Confirmation of a submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Form id the answers were recorded under.
    pub prospect_form_id: FormId,
    /// The form had already been submitted.
    pub duplicate: bool,
    /// Responses written by this request.
    pub responses_created: usize,
    /// Follow-up steps offered to the visitor.
    pub next: NextSteps,
}

/// Links to the follow-up steps.
#[derive(Debug, Serialize)]
pub struct NextSteps {
    /// Join form.
    pub join: String,
    /// Decline.
    pub no_join: String,
    /// Self-study signup.
    pub self_study: String,
}

impl NextSteps {
    fn for_form(form_id: &FormId) -> Self {
        Self {
            join: format!("/forms/prospect/{form_id}/join"),
            no_join: format!("/forms/prospect/{form_id}/no-join"),
            self_study: format!("/forms/prospect/{form_id}/self-study"),
        }
    }
}

/// Confirmation of a join.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    /// Created prospect.
    pub prospect_id: Uuid,
    /// Form the prospect was created from.
    pub prospect_form_id: String,
    /// Confirmation text.
    pub message: String,
}

/// GET /forms/{questionnaire_id} - Open a questionnaire and issue a form id.
async fn open_form(
    State(state): State<AppState>,
    Path(questionnaire_id): Path<Uuid>,
) -> ApiResult<Json<OpenedForm>> {
    let repo = QuestionnaireRepository::new((*state.db).clone());
    let opened = repo.open_form(questionnaire_id).await?;
    Ok(Json(opened))
}

/// Splits the posted fields into the form id and the answers by question.
///
/// Fields that are not `question_{uuid}` are ignored.
fn parse_submission(fields: HashMap<String, String>) -> (Option<String>, HashMap<Uuid, String>) {
    let mut form_id = None;
    let mut answers = HashMap::new();

    for (name, value) in fields {
        if name == "new_form_id" {
            form_id = Some(value);
        } else if let Some(raw) = name.strip_prefix(QUESTION_FIELD_PREFIX)
            && let Ok(question_id) = Uuid::parse_str(raw)
        {
            answers.insert(question_id, value);
        }
    }

    (form_id, answers)
}

/// POST /forms/{questionnaire_id}/submit - Record the answers once.
async fn submit_form(
    State(state): State<AppState>,
    Path(questionnaire_id): Path<Uuid>,
    Form(fields): Form<HashMap<String, String>>,
) -> ApiResult<Json<SubmitResponse>> {
    let (form_id, answers) = parse_submission(fields);
    debug!(%questionnaire_id, answers = answers.len(), "Form posted");

    let repo = QuestionnaireRepository::new((*state.db).clone());
    let outcome = repo
        .submit_form(questionnaire_id, form_id.as_deref(), &answers)
        .await?;

    Ok(Json(SubmitResponse {
        next: NextSteps::for_form(&outcome.prospect_form_id),
        prospect_form_id: outcome.prospect_form_id,
        duplicate: outcome.duplicate,
        responses_created: outcome.responses_created,
    }))
}

async fn record_step(
    state: &AppState,
    raw_form_id: &str,
    action: FunnelAction,
) -> ApiResult<Json<StepResponse>> {
    let form_id = FormId::parse(raw_form_id)?;
    FunnelRepository::new((*state.db).clone())
        .record(&form_id, action)
        .await
        .map_err(|e| ApiError::database(&e))?;
    Ok(Json(StepResponse { form_id, action }))
}

/// GET /forms/prospect/{form_id}/join - Show the join form.
async fn begin_join(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<StepResponse>> {
    record_step(&state, &form_id, FunnelAction::ProspectSigningUp).await
}

/// POST /forms/prospect/{form_id}/join - Create the prospect.
async fn complete_join(
    State(state): State<AppState>,
    identity: Identity,
    Path(form_id): Path<String>,
    Form(details): Form<JoinDetails>,
) -> ApiResult<impl IntoResponse> {
    let form_id = FormId::parse(&form_id)?;

    let fallback = state
        .resolver()
        .resolve(identity.context())
        .await
        .map_err(|e| ApiError::database(&e))?
        .map(|org| org.id);

    let prospect = ProspectRepository::new((*state.db).clone())
        .complete_join(&form_id, details, fallback)
        .await?;

    info!(prospect_id = %prospect.id, "Visitor joined");

    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            message: format!("Welcome, {}", prospect.name),
            prospect_id: prospect.id,
            prospect_form_id: prospect.prospect_form_id,
        }),
    ))
}

/// GET /forms/prospect/{form_id}/no-join - Decline.
async fn decline(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<StepResponse>> {
    record_step(&state, &form_id, FunnelAction::ProspectDeclined).await
}

/// GET /forms/prospect/{form_id}/self-study - Choose self-study.
async fn self_study(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<StepResponse>> {
    record_step(&state, &form_id, FunnelAction::ProspectSelfStudySignup).await
}

/// GET /forms/prospect/{form_id}/final-success - Final page.
async fn final_success(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<StepResponse>> {
    record_step(&state, &form_id, FunnelAction::ProspectFinalSuccess).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submission_collects_answers() {
        let question_id = Uuid::new_v4();
        let fields = HashMap::from([
            ("new_form_id".to_string(), "ABC".to_string()),
            (format!("question_{question_id}"), "Yes".to_string()),
            ("question_not-a-uuid".to_string(), "ignored".to_string()),
            ("csrf".to_string(), "ignored".to_string()),
        ]);

        let (form_id, answers) = parse_submission(fields);

        assert_eq!(form_id.as_deref(), Some("ABC"));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(&question_id).map(String::as_str), Some("Yes"));
    }

    #[test]
    fn test_parse_submission_without_form_id() {
        let (form_id, answers) = parse_submission(HashMap::new());
        assert!(form_id.is_none());
        assert!(answers.is_empty());
    }
}
