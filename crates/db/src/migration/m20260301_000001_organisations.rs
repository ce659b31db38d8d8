//! Organisations, users, profiles and trainings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organisations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Organisations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Organisations::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Organisations::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Organisations::PhoneNumber).string_len(20).null())
                    .col(timestamp(Organisations::CreatedAt))
                    .col(timestamp(Organisations::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(150).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(254).not_null())
                    .col(timestamp(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AppUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AppUsers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AppUsers::OrganisationId).uuid().not_null())
                    .col(ColumnDef::new(AppUsers::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(AppUsers::Role).string_len(50).not_null())
                    .col(timestamp(AppUsers::CreatedAt))
                    .col(timestamp(AppUsers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(AppUsers::Table, AppUsers::OrganisationId)
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AppUsers::Table, AppUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DisciplerProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DisciplerProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DisciplerProfiles::AppUserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DisciplerProfiles::Bio).text().null())
                    .col(timestamp(DisciplerProfiles::CreatedAt))
                    .col(timestamp(DisciplerProfiles::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(DisciplerProfiles::Table, DisciplerProfiles::AppUserId)
                            .to(AppUsers::Table, AppUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trainings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trainings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Trainings::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Trainings::Description).text().null())
                    .col(timestamp(Trainings::CreatedAt))
                    .col(timestamp(Trainings::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TrainingOrganisations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TrainingOrganisations::TrainingId).uuid().not_null())
                    .col(
                        ColumnDef::new(TrainingOrganisations::OrganisationId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(TrainingOrganisations::TrainingId)
                            .col(TrainingOrganisations::OrganisationId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrainingOrganisations::Table, TrainingOrganisations::TrainingId)
                            .to(Trainings::Table, Trainings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                TrainingOrganisations::Table,
                                TrainingOrganisations::OrganisationId,
                            )
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DisciplerTrainings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DisciplerTrainings::DisciplerId).uuid().not_null())
                    .col(ColumnDef::new(DisciplerTrainings::TrainingId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(DisciplerTrainings::DisciplerId)
                            .col(DisciplerTrainings::TrainingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DisciplerTrainings::Table, DisciplerTrainings::DisciplerId)
                            .to(DisciplerProfiles::Table, DisciplerProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DisciplerTrainings::Table, DisciplerTrainings::TrainingId)
                            .to(Trainings::Table, Trainings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TraineeProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TraineeProfiles::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(TraineeProfiles::AppUserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TraineeProfiles::TrainingId).uuid().not_null())
                    .col(
                        ColumnDef::new(TraineeProfiles::Status)
                            .string_len(50)
                            .not_null()
                            .default("enrolled"),
                    )
                    .col(timestamp(TraineeProfiles::CreatedAt))
                    .col(timestamp(TraineeProfiles::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(TraineeProfiles::Table, TraineeProfiles::AppUserId)
                            .to(AppUsers::Table, AppUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TraineeProfiles::Table, TraineeProfiles::TrainingId)
                            .to(Trainings::Table, Trainings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            TraineeProfiles::Table.into_iden(),
            DisciplerTrainings::Table.into_iden(),
            TrainingOrganisations::Table.into_iden(),
            Trainings::Table.into_iden(),
            DisciplerProfiles::Table.into_iden(),
            AppUsers::Table.into_iden(),
            Users::Table.into_iden(),
            Organisations::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

/// Non-null timestamp column.
pub(super) fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[derive(Iden)]
pub(super) enum Organisations {
    Table,
    Id,
    Name,
    Email,
    PhoneNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Email,
    CreatedAt,
}

#[derive(Iden)]
enum AppUsers {
    Table,
    Id,
    OrganisationId,
    UserId,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum DisciplerProfiles {
    Table,
    Id,
    AppUserId,
    Bio,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Trainings {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TrainingOrganisations {
    Table,
    TrainingId,
    OrganisationId,
}

#[derive(Iden)]
enum DisciplerTrainings {
    Table,
    DisciplerId,
    TrainingId,
}

#[derive(Iden)]
enum TraineeProfiles {
    Table,
    Id,
    AppUserId,
    TrainingId,
    Status,
    CreatedAt,
    UpdatedAt,
}
