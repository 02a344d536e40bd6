//! License entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// License under which an image may be reused.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "license")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// License title.
    pub title: String,

    /// Short code, e.g. `CC BY-NC 4.0`.
    #[sea_orm(unique)]
    pub short_name: String,

    /// Link to the license text.
    #[sea_orm(nullable)]
    pub url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::licensing::Entity")]
    Licensings,
}

impl Related<super::licensing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Licensings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
