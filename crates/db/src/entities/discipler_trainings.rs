//! `SeaORM` Entity for discipler_trainings table.
//!
//! Trainings a discipler has completed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "discipler_trainings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub discipler_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub training_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
