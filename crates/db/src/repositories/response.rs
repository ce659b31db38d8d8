//! Survey response list view.

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use shepherd_core::listing::RESPONSES_PER_PAGE;
use shepherd_shared::types::{PageRequest, PageResponse};
use uuid::Uuid;

use super::{active_questionnaire_ids, contains_ci};
use crate::entities::{questionnaires, questions, responses};

/// One recorded answer.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ResponseRow {
    /// Response ID.
    pub id: Uuid,
    /// Submission the answer belongs to.
    pub prospect_form_id: String,
    /// Questionnaire name.
    pub questionnaire_name: String,
    /// Question text.
    pub question_text: String,
    /// Answer.
    pub answer_text: String,
    /// When it was recorded.
    pub submitted_at: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Survey response list view.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseListing {
    /// Applied search.
    pub search: Option<String>,
    /// Current page.
    pub responses: PageResponse<ResponseRow>,
    /// Responses across the organisation's active questionnaires.
    pub total_responses: u64,
}

/// Response repository.
#[derive(Debug, Clone)]
pub struct ResponseRepository {
    db: DatabaseConnection,
}

impl ResponseRepository {
    /// Creates a new response repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Counts the responses recorded for a form.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_for_form(&self, form_id: &str) -> Result<u64, DbErr> {
        responses::Entity::find()
            .filter(responses::Column::ProspectFormId.eq(form_id))
            .count(&self.db)
            .await
    }

    /// Lists responses of the organisation's active questionnaires.
    ///
    /// Newest first, 20 per page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organisation_id: Uuid,
        search: Option<String>,
        page: Option<u32>,
    ) -> Result<ResponseListing, DbErr> {
        let page = PageRequest::new(page, RESPONSES_PER_PAGE);
        let questionnaire_ids = active_questionnaire_ids(&self.db, organisation_id).await?;

        let base = responses::Entity::find()
            .join(JoinType::InnerJoin, responses::Relation::Questions.def())
            .join(JoinType::InnerJoin, questions::Relation::Questionnaires.def())
            .filter(questions::Column::QuestionnaireId.is_in(questionnaire_ids));

        let total_responses = base.clone().count(&self.db).await?;

        let mut query = base;
        if let Some(q) = &search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci::<responses::Entity>(
                        responses::Column::ProspectFormId,
                        q,
                    ))
                    .add(contains_ci::<questionnaires::Entity>(
                        questionnaires::Column::Name,
                        q,
                    ))
                    .add(contains_ci::<questions::Entity>(questions::Column::Text, q))
                    .add(contains_ci::<responses::Entity>(
                        responses::Column::AnswerText,
                        q,
                    )),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .select_only()
            .column(responses::Column::Id)
            .column(responses::Column::ProspectFormId)
            .column_as(questionnaires::Column::Name, "questionnaire_name")
            .column_as(questions::Column::Text, "question_text")
            .column(responses::Column::AnswerText)
            .column(responses::Column::SubmittedAt)
            .order_by_desc(responses::Column::SubmittedAt)
            .order_by_desc(responses::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .into_model::<ResponseRow>()
            .all(&self.db)
            .await?;

        Ok(ResponseListing {
            search,
            responses: PageResponse::new(rows, page.page, page.per_page, total),
            total_responses,
        })
    }
}
