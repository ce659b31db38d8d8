//! `SeaORM` Entity for discipleship_follow_ups table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "discipleship_follow_ups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub prospect_id: Uuid,
    pub discipler_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prospects::Entity",
        from = "Column::ProspectId",
        to = "super::prospects::Column::Id",
        on_delete = "Cascade"
    )]
    Prospects,
    #[sea_orm(
        belongs_to = "super::discipler_profiles::Entity",
        from = "Column::DisciplerId",
        to = "super::discipler_profiles::Column::Id",
        on_delete = "Cascade"
    )]
    DisciplerProfiles,
}

impl Related<super::prospects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prospects.def()
    }
}

impl Related<super::discipler_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DisciplerProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
