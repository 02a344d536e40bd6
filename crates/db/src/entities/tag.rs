//! Tag entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tag entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name, also the sort key.
    #[sea_orm(unique)]
    pub name: String,

    /// When the tag was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tagging::Entity")]
    Taggings,
}

impl Related<super::tagging::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Taggings.def()
    }
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        super::tagging::Relation::Image.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tagging::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
