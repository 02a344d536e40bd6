//! Tagging entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tagging - joins an image to a tag.
///
/// `staff_tag` separates tags applied by staff from tags that came with the
/// image from the source service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tagging")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Tagged image.
    #[sea_orm(indexed)]
    pub image_id: String,

    /// Applied tag.
    #[sea_orm(indexed)]
    pub tag_id: String,

    /// Whether staff applied this tag.
    #[sea_orm(default_value = false)]
    pub staff_tag: bool,

    /// When the tagging was created.
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
    #[sea_orm(
        belongs_to = "super::tag::Entity",
        from = "Column::TagId",
        to = "super::tag::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
