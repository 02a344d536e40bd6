//! Battle entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Battle - a head-to-head vote between two images.
///
/// `image_id` is the winner.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "battle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Winning image.
    #[sea_orm(indexed)]
    pub image_id: String,

    /// Losing image.
    #[sea_orm(indexed)]
    pub loser_id: String,

    /// When the battle was decided.
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
    Winner,
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::LoserId",
        to = "super::image::Column::Id",
        on_delete = "Cascade"
    )]
    Loser,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Winner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
