//! Questionnaire response recorder.
//!
//! Opening a form issues a fresh form id and logs the view. Submitting writes
//! one response per question and logs the submission, unless the log already
//! shows a submission for that form id.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use shepherd_core::funnel::{FormId, FunnelAction, FunnelError};
use shepherd_shared::AppError;
use tracing::{info, warn};
use uuid::Uuid;

use super::{funnel, is_unique_violation};
use crate::entities::{question_select_options, questionnaires, questions, responses, select_options};

/// Error types for questionnaire recording.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// Questionnaire not found.
    #[error("Questionnaire not found: {0}")]
    QuestionnaireNotFound(Uuid),

    /// Form id missing or unusable.
    #[error(transparent)]
    InvalidFormId(#[from] FunnelError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<RecorderError> for AppError {
    fn from(err: RecorderError) -> Self {
        match err {
            RecorderError::QuestionnaireNotFound(_) => Self::NotFound(err.to_string()),
            RecorderError::InvalidFormId(e) => e.into(),
            RecorderError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A question with its select options in display order.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithOptions {
    /// The question.
    #[serde(flatten)]
    pub question: questions::Model,
    /// Options, empty for text questions.
    pub options: Vec<select_options::Model>,
}

/// A freshly opened form.
#[derive(Debug, Clone, Serialize)]
pub struct OpenedForm {
    /// The questionnaire.
    pub questionnaire: questionnaires::Model,
    /// Questions in display order.
    pub questions: Vec<QuestionWithOptions>,
    /// Form id issued for this visit.
    pub new_form_id: FormId,
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    /// Form id the responses are tagged with.
    pub prospect_form_id: FormId,
    /// The form had already been submitted; nothing was written.
    pub duplicate: bool,
    /// Responses written by this call.
    pub responses_created: usize,
}

/// Questionnaire repository.
#[derive(Debug, Clone)]
pub struct QuestionnaireRepository {
    db: DatabaseConnection,
}

impl QuestionnaireRepository {
    /// Creates a new questionnaire repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a questionnaire by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<questionnaires::Model>, DbErr> {
        questionnaires::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads a questionnaire's questions in `sort_order`, each with its
    /// options in `sort_order`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn questions_with_options(
        &self,
        questionnaire_id: Uuid,
    ) -> Result<Vec<QuestionWithOptions>, DbErr> {
        let questions = questions::Entity::find()
            .filter(questions::Column::QuestionnaireId.eq(questionnaire_id))
            .order_by_asc(questions::Column::SortOrder)
            .order_by_asc(questions::Column::Id)
            .all(&self.db)
            .await?;

        let question_ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        let links = question_select_options::Entity::find()
            .filter(question_select_options::Column::QuestionId.is_in(question_ids))
            .all(&self.db)
            .await?;

        let option_ids: Vec<Uuid> = links.iter().map(|l| l.select_option_id).collect();
        let options: HashMap<Uuid, select_options::Model> = select_options::Entity::find()
            .filter(select_options::Column::Id.is_in(option_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        let mut by_question: HashMap<Uuid, Vec<select_options::Model>> = HashMap::new();
        for link in links {
            if let Some(option) = options.get(&link.select_option_id) {
                by_question
                    .entry(link.question_id)
                    .or_default()
                    .push(option.clone());
            }
        }

        Ok(questions
            .into_iter()
            .map(|question| {
                let mut options = by_question.remove(&question.id).unwrap_or_default();
                options.sort_by_key(|o| (o.sort_order, o.id));
                QuestionWithOptions { question, options }
            })
            .collect())
    }

    /// Opens a questionnaire for a new visitor.
    ///
    /// Issues a fresh form id and logs one `form_viewed` event.
    ///
    /// # Errors
    ///
    /// Returns `QuestionnaireNotFound` for an unknown questionnaire.
    pub async fn open_form(&self, questionnaire_id: Uuid) -> Result<OpenedForm, RecorderError> {
        let questionnaire = self
            .find_by_id(questionnaire_id)
            .await?
            .ok_or(RecorderError::QuestionnaireNotFound(questionnaire_id))?;

        let questions = self.questions_with_options(questionnaire_id).await?;
        let new_form_id = FormId::generate();
        funnel::append(&self.db, &new_form_id, FunnelAction::FormViewed).await?;

        Ok(OpenedForm {
            questionnaire,
            questions,
            new_form_id,
        })
    }

    /// Records a submission.
    ///
    /// A repeated submission for the same form id writes nothing and is
    /// reported with `duplicate` set. Questions without an answer get an
    /// empty response.
    ///
    /// # Errors
    ///
    /// Returns `QuestionnaireNotFound` for an unknown questionnaire and
    /// `InvalidFormId` when the form id is missing or blank.
    pub async fn submit_form(
        &self,
        questionnaire_id: Uuid,
        form_id: Option<&str>,
        answers: &HashMap<Uuid, String>,
    ) -> Result<SubmitOutcome, RecorderError> {
        if self.find_by_id(questionnaire_id).await?.is_none() {
            return Err(RecorderError::QuestionnaireNotFound(questionnaire_id));
        }
        let form_id = FormId::parse_opt(form_id)?;

        let questions = questions::Entity::find()
            .filter(questions::Column::QuestionnaireId.eq(questionnaire_id))
            .order_by_asc(questions::Column::SortOrder)
            .order_by_asc(questions::Column::Id)
            .all(&self.db)
            .await?;

        let txn = self.db.begin().await?;

        if funnel::has_action(&txn, &form_id, FunnelAction::FormSubmitted).await? {
            txn.rollback().await?;
            warn!(form_id = %form_id, %questionnaire_id, "Duplicate form submission ignored");
            return Ok(duplicate(form_id));
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        for question in &questions {
            let answer = answers.get(&question.id).cloned().unwrap_or_default();
            let inserted = responses::ActiveModel {
                id: Set(Uuid::new_v4()),
                question_id: Set(question.id),
                answer_text: Set(answer),
                prospect_form_id: Set(form_id.as_str().to_string()),
                submitted_at: Set(now),
            }
            .insert(&txn)
            .await;

            match inserted {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => {
                    txn.rollback().await?;
                    warn!(form_id = %form_id, %questionnaire_id, "Concurrent duplicate submission ignored");
                    return Ok(duplicate(form_id));
                }
                Err(e) => return Err(e.into()),
            }
        }

        funnel::append(&txn, &form_id, FunnelAction::FormSubmitted).await?;
        txn.commit().await?;

        info!(
            form_id = %form_id,
            %questionnaire_id,
            responses = questions.len(),
            "Form submitted"
        );

        Ok(SubmitOutcome {
            prospect_form_id: form_id,
            duplicate: false,
            responses_created: questions.len(),
        })
    }
}

const fn duplicate(form_id: FormId) -> SubmitOutcome {
    SubmitOutcome {
        prospect_form_id: form_id,
        duplicate: true,
        responses_created: 0,
    }
}
