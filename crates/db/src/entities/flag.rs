//! Flag entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Flag - a report that an image needs another look.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Flagged image.
    #[sea_orm(indexed)]
    pub image_id: String,

    /// Flagging user, if signed in.
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    /// When the flag was raised.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::ImageId",
        to = "super::image::Column::Id",
        on_delete = "Cascade"
    )]
    Image,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
