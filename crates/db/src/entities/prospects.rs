//! `SeaORM` Entity for prospects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prospects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<String>,
    #[sea_orm(unique)]
    pub prospect_form_id: String,
    pub organisation_id: Uuid,
    pub discipler_id: Option<Uuid>,
    pub joined_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organisations::Entity",
        from = "Column::OrganisationId",
        to = "super::organisations::Column::Id",
        on_delete = "Cascade"
    )]
    Organisations,
    #[sea_orm(
        belongs_to = "super::discipler_profiles::Entity",
        from = "Column::DisciplerId",
        to = "super::discipler_profiles::Column::Id",
        on_delete = "SetNull"
    )]
    DisciplerProfiles,
}

impl Related<super::organisations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organisations.def()
    }
}

impl Related<super::discipler_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DisciplerProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
