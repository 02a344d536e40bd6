//! Tag repository.

use std::sync::Arc;

use crate::entities::{Tag, Tagging, tag, tagging};
use lentil_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find all tags ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tag by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tag.
    pub async fn create(&self, model: tag::ActiveModel) -> AppResult<tag::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the taggings of an image together with their tags.
    ///
    /// Taggings whose tag row has gone missing are skipped.
    pub async fn find_taggings_with_tags(
        &self,
        image_id: &str,
    ) -> AppResult<Vec<(tagging::Model, tag::Model)>> {
        let rows = Tagging::find()
            .filter(tagging::Column::ImageId.eq(image_id))
            .find_also_related(Tag)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|(tagging, tag)| tag.map(|tag| (tagging, tag)))
            .collect())
    }

    /// Attach a tag to an image.
    pub async fn add_tagging(&self, model: tagging::ActiveModel) -> AppResult<tagging::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Detach a tag from an image.
    pub async fn remove_tagging(
        &self,
        image_id: &str,
        tag_id: &str,
        staff_tag: bool,
    ) -> AppResult<()> {
        Tagging::delete_many()
            .filter(tagging::Column::ImageId.eq(image_id))
            .filter(tagging::Column::TagId.eq(tag_id))
            .filter(tagging::Column::StaffTag.eq(staff_tag))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn tag(id: &str, name: &str) -> tag::Model {
        tag::Model {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn tagging(image_id: &str, tag_id: &str, staff_tag: bool) -> tagging::Model {
        tagging::Model {
            id: format!("{image_id}_{tag_id}_{staff_tag}"),
            image_id: image_id.to_string(),
            tag_id: tag_id.to_string(),
            staff_tag,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_all() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag("t1", "architecture"), tag("t2", "library")]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.find_all().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "architecture");
    }

    #[tokio::test]
    async fn test_find_taggings_with_tags() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    (tagging("img1", "t1", false), tag("t1", "library")),
                    (tagging("img1", "t2", true), tag("t2", "reading")),
                ]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.find_taggings_with_tags("img1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(!result[0].0.staff_tag);
        assert_eq!(result[1].1.name, "reading");
    }

    #[tokio::test]
    async fn test_remove_tagging() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        assert!(repo.remove_tagging("img1", "t1", true).await.is_ok());
    }
}
