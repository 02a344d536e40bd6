//! Flag repository.

use std::sync::Arc;

use crate::entities::{Flag, flag};
use lentil_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Flag repository for database operations.
#[derive(Clone)]
pub struct FlagRepository {
    db: Arc<DatabaseConnection>,
}

impl FlagRepository {
    /// Create a new flag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a flag.
    pub async fn create(&self, model: flag::ActiveModel) -> AppResult<flag::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count flags raised against an image.
    pub async fn count_for_image(&self, image_id: &str) -> AppResult<u64> {
        Flag::find()
            .filter(flag::Column::ImageId.eq(image_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
