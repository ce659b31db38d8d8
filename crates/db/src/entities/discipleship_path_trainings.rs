//! `SeaORM` Entity for discipleship_path_trainings table.
//!
//! Trainings composed into a discipleship path.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "discipleship_path_trainings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub discipleship_path_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub training_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
