//! Admin user entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin user - a moderator.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Login email.
    #[sea_orm(unique)]
    pub email: String,

    /// When the admin user was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::image::Entity")]
    ModeratedImages,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModeratedImages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
