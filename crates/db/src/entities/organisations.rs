//! `SeaORM` Entity for organisations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "organisations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::app_users::Entity")]
    AppUsers,
    #[sea_orm(has_many = "super::prospects::Entity")]
    Prospects,
    #[sea_orm(has_many = "super::active_questionnaires::Entity")]
    ActiveQuestionnaires,
}

impl Related<super::app_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppUsers.def()
    }
}

impl Related<super::prospects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prospects.def()
    }
}

impl Related<super::active_questionnaires::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActiveQuestionnaires.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
