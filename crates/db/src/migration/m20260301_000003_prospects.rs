//! Prospects, discipleship paths, follow-ups and config.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_organisations::{
    DisciplerProfiles, Organisations, Trainings, timestamp,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prospects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Prospects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Prospects::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Prospects::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Prospects::PhoneNumber).string_len(20).null())
                    .col(
                        ColumnDef::new(Prospects::ProspectFormId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Prospects::OrganisationId).uuid().not_null())
                    .col(ColumnDef::new(Prospects::DisciplerId).uuid().null())
                    .col(timestamp(Prospects::JoinedAt))
                    .col(timestamp(Prospects::CreatedAt))
                    .col(timestamp(Prospects::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Prospects::Table, Prospects::OrganisationId)
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Prospects::Table, Prospects::DisciplerId)
                            .to(DisciplerProfiles::Table, DisciplerProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiscipleshipPaths::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscipleshipPaths::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiscipleshipPaths::Name).string_len(200).not_null())
                    .col(ColumnDef::new(DiscipleshipPaths::Description).text().null())
                    .col(timestamp(DiscipleshipPaths::CreatedAt))
                    .col(timestamp(DiscipleshipPaths::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiscipleshipPathTrainings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscipleshipPathTrainings::DiscipleshipPathId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscipleshipPathTrainings::TrainingId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DiscipleshipPathTrainings::DiscipleshipPathId)
                            .col(DiscipleshipPathTrainings::TrainingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                DiscipleshipPathTrainings::Table,
                                DiscipleshipPathTrainings::DiscipleshipPathId,
                            )
                            .to(DiscipleshipPaths::Table, DiscipleshipPaths::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                DiscipleshipPathTrainings::Table,
                                DiscipleshipPathTrainings::TrainingId,
                            )
                            .to(Trainings::Table, Trainings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiscipleshipPathAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscipleshipPathAssignments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DiscipleshipPathAssignments::ProspectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscipleshipPathAssignments::DiscipleshipPathId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscipleshipPathAssignments::CompletionStatus)
                            .string_len(50)
                            .not_null()
                            .default("not_started"),
                    )
                    .col(timestamp(DiscipleshipPathAssignments::AssignedAt))
                    .col(timestamp(DiscipleshipPathAssignments::CreatedAt))
                    .col(timestamp(DiscipleshipPathAssignments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                DiscipleshipPathAssignments::Table,
                                DiscipleshipPathAssignments::ProspectId,
                            )
                            .to(Prospects::Table, Prospects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                DiscipleshipPathAssignments::Table,
                                DiscipleshipPathAssignments::DiscipleshipPathId,
                            )
                            .to(DiscipleshipPaths::Table, DiscipleshipPaths::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiscipleshipFollowUps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscipleshipFollowUps::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiscipleshipFollowUps::ProspectId).uuid().not_null())
                    .col(ColumnDef::new(DiscipleshipFollowUps::DisciplerId).uuid().not_null())
                    .col(ColumnDef::new(DiscipleshipFollowUps::Notes).text().null())
                    .col(
                        ColumnDef::new(DiscipleshipFollowUps::FollowUpDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp(DiscipleshipFollowUps::CreatedAt))
                    .col(timestamp(DiscipleshipFollowUps::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(DiscipleshipFollowUps::Table, DiscipleshipFollowUps::ProspectId)
                            .to(Prospects::Table, Prospects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                DiscipleshipFollowUps::Table,
                                DiscipleshipFollowUps::DisciplerId,
                            )
                            .to(DisciplerProfiles::Table, DisciplerProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Configs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Configs::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Configs::ConfigKey)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Configs::ConfigValue).text().null())
                    .col(timestamp(Configs::CreatedAt))
                    .col(timestamp(Configs::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Configs::Table.into_iden(),
            DiscipleshipFollowUps::Table.into_iden(),
            DiscipleshipPathAssignments::Table.into_iden(),
            DiscipleshipPathTrainings::Table.into_iden(),
            DiscipleshipPaths::Table.into_iden(),
            Prospects::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Prospects {
    Table,
    Id,
    Name,
    Email,
    PhoneNumber,
    ProspectFormId,
    OrganisationId,
    DisciplerId,
    JoinedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DiscipleshipPaths {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DiscipleshipPathTrainings {
    Table,
    DiscipleshipPathId,
    TrainingId,
}

#[derive(Iden)]
enum DiscipleshipPathAssignments {
    Table,
    Id,
    ProspectId,
    DiscipleshipPathId,
    CompletionStatus,
    AssignedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DiscipleshipFollowUps {
    Table,
    Id,
    ProspectId,
    DisciplerId,
    Notes,
    FollowUpDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Configs {
    Table,
    Id,
    ConfigKey,
    ConfigValue,
    CreatedAt,
    UpdatedAt,
}
