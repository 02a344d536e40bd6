//! License repository.

use std::sync::Arc;

use crate::entities::{License, Licensing, license, licensing};
use lentil_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// License repository for database operations.
#[derive(Clone)]
pub struct LicenseRepository {
    db: Arc<DatabaseConnection>,
}

impl LicenseRepository {
    /// Create a new license repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a license by its short name (e.g. `CC-BY`).
    pub async fn find_by_short_name(&self, short_name: &str) -> AppResult<Option<license::Model>> {
        License::find()
            .filter(license::Column::ShortName.eq(short_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the licenses granted for an image.
    pub async fn find_for_image(&self, image_id: &str) -> AppResult<Vec<license::Model>> {
        License::find()
            .inner_join(Licensing)
            .filter(licensing::Column::ImageId.eq(image_id))
            .order_by_asc(license::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new license.
    pub async fn create(&self, model: license::ActiveModel) -> AppResult<license::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Grant a license for an image.
    pub async fn grant(&self, model: licensing::ActiveModel) -> AppResult<licensing::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn license(id: &str, title: &str, short_name: &str) -> license::Model {
        license::Model {
            id: id.to_string(),
            title: title.to_string(),
            short_name: short_name.to_string(),
            url: None,
        }
    }

    #[tokio::test]
    async fn test_find_for_image() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    license("l1", "Attribution", "CC-BY"),
                    license("l2", "Public Domain", "CC0"),
                ]])
                .into_connection(),
        );

        let repo = LicenseRepository::new(db);
        let result = repo.find_for_image("img1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].short_name, "CC0");
    }

    #[tokio::test]
    async fn test_find_by_short_name_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<license::Model>::new()])
                .into_connection(),
        );

        let repo = LicenseRepository::new(db);
        assert!(repo.find_by_short_name("GPL").await.unwrap().is_none());
    }
}
