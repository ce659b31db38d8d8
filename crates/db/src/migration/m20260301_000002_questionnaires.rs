//! Questionnaires, responses and the funnel event log.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_organisations::{Organisations, timestamp};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Questionnaires::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Questionnaires::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Questionnaires::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Questionnaires::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Questionnaires::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(timestamp(Questionnaires::CreatedAt))
                    .col(timestamp(Questionnaires::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Questions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Questions::QuestionnaireId).uuid().not_null())
                    .col(ColumnDef::new(Questions::Text).text().not_null())
                    .col(ColumnDef::new(Questions::QuestionType).string_len(20).not_null())
                    .col(ColumnDef::new(Questions::SortOrder).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::QuestionnaireId)
                            .to(Questionnaires::Table, Questionnaires::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SelectOptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SelectOptions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SelectOptions::Text).string_len(200).not_null())
                    .col(ColumnDef::new(SelectOptions::Value).string_len(200).null())
                    .col(ColumnDef::new(SelectOptions::SortOrder).integer().not_null())
                    .col(timestamp(SelectOptions::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionSelectOptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(QuestionSelectOptions::QuestionId).uuid().not_null())
                    .col(
                        ColumnDef::new(QuestionSelectOptions::SelectOptionId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(QuestionSelectOptions::QuestionId)
                            .col(QuestionSelectOptions::SelectOptionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuestionSelectOptions::Table, QuestionSelectOptions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                QuestionSelectOptions::Table,
                                QuestionSelectOptions::SelectOptionId,
                            )
                            .to(SelectOptions::Table, SelectOptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Responses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Responses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Responses::QuestionId).uuid().not_null())
                    .col(
                        ColumnDef::new(Responses::AnswerText)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Responses::ProspectFormId).string_len(100).not_null())
                    .col(timestamp(Responses::SubmittedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Responses::Table, Responses::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One answer per question per submission.
        manager
            .create_index(
                Index::create()
                    .name("uq_responses_question_form")
                    .table(Responses::Table)
                    .col(Responses::QuestionId)
                    .col(Responses::ProspectFormId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_responses_submitted_at")
                    .table(Responses::Table)
                    .col(Responses::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionnaireLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionnaireLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionnaireLogs::FormId).string_len(200).not_null())
                    .col(ColumnDef::new(QuestionnaireLogs::Action).string_len(100).not_null())
                    .col(timestamp(QuestionnaireLogs::Timestamp))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questionnaire_logs_form_action")
                    .table(QuestionnaireLogs::Table)
                    .col(QuestionnaireLogs::FormId)
                    .col(QuestionnaireLogs::Action)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActiveQuestionnaires::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActiveQuestionnaires::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActiveQuestionnaires::OrganisationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActiveQuestionnaires::QuestionnaireId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActiveQuestionnaires::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(ActiveQuestionnaires::ActivatedAt))
                    .col(
                        ColumnDef::new(ActiveQuestionnaires::DeactivatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp(ActiveQuestionnaires::CreatedAt))
                    .col(timestamp(ActiveQuestionnaires::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActiveQuestionnaires::Table, ActiveQuestionnaires::OrganisationId)
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ActiveQuestionnaires::Table,
                                ActiveQuestionnaires::QuestionnaireId,
                            )
                            .to(Questionnaires::Table, Questionnaires::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            ActiveQuestionnaires::Table.into_iden(),
            QuestionnaireLogs::Table.into_iden(),
            Responses::Table.into_iden(),
            QuestionSelectOptions::Table.into_iden(),
            SelectOptions::Table.into_iden(),
            Questions::Table.into_iden(),
            Questionnaires::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Questionnaires {
    Table,
    Id,
    Name,
    Title,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Questions {
    Table,
    Id,
    QuestionnaireId,
    Text,
    QuestionType,
    SortOrder,
}

#[derive(Iden)]
enum SelectOptions {
    Table,
    Id,
    Text,
    Value,
    SortOrder,
    CreatedAt,
}

#[derive(Iden)]
enum QuestionSelectOptions {
    Table,
    QuestionId,
    SelectOptionId,
}

#[derive(Iden)]
enum Responses {
    Table,
    Id,
    QuestionId,
    AnswerText,
    ProspectFormId,
    SubmittedAt,
}

#[derive(Iden)]
enum QuestionnaireLogs {
    Table,
    Id,
    FormId,
    Action,
    Timestamp,
}

#[derive(Iden)]
enum ActiveQuestionnaires {
    Table,
    Id,
    OrganisationId,
    QuestionnaireId,
    IsActive,
    ActivatedAt,
    DeactivatedAt,
    CreatedAt,
    UpdatedAt,
}
