//! Image repository.

use std::sync::Arc;

use super::write_error;
use crate::entities::{Image, User, image, user};
use crate::scope::VisibleImages;
use chrono::Utc;
use lentil_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub per_page: u64,
    /// Total items across all pages.
    pub total_entries: u64,
}

impl<T> Page<T> {
    /// Number of pages needed for `total_entries`.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            0
        } else {
            self.total_entries.div_ceil(self.per_page)
        }
    }

    /// Convert the items, keeping the page counters.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_entries: self.total_entries,
        }
    }
}

/// Image repository for database operations.
#[derive(Clone)]
pub struct ImageRepository {
    db: Arc<DatabaseConnection>,
}

impl ImageRepository {
    /// Create a new image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a visible image by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<image::Model>> {
        VisibleImages::new()
            .with_id(id)
            .into_select()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a visible image by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<image::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ImageNotFound(id.to_string()))
    }

    /// Find an image by ID, including images hidden by the quality gate.
    ///
    /// Only the file health check should need this.
    pub async fn find_by_id_unscoped(&self, id: &str) -> AppResult<Option<image::Model>> {
        Image::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an image by its source identifier for one user.
    ///
    /// Hidden images are included; the identifier stays taken.
    pub async fn find_by_external_identifier(
        &self,
        user_id: &str,
        external_identifier: &str,
    ) -> AppResult<Option<image::Model>> {
        Image::find()
            .filter(image::Column::UserId.eq(user_id))
            .filter(image::Column::ExternalIdentifier.eq(external_identifier))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch images from a scope.
    pub async fn find(
        &self,
        scope: VisibleImages,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<image::Model>> {
        scope
            .into_select()
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count images in a scope.
    pub async fn count(&self, scope: VisibleImages) -> AppResult<u64> {
        scope
            .into_select()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch one page of a scope.
    ///
    /// When `total_entries` is given the count query is skipped.
    pub async fn paginate(
        &self,
        scope: VisibleImages,
        page: u64,
        per_page: u64,
        total_entries: Option<u64>,
    ) -> AppResult<Page<image::Model>> {
        if page == 0 {
            return Err(AppError::BadRequest("Page numbers start at 1".to_string()));
        }
        if per_page == 0 {
            return Err(AppError::BadRequest(
                "Page size must be positive".to_string(),
            ));
        }

        let select = scope.into_select();

        let (items, total_entries) = match total_entries {
            Some(total) => {
                let items = select
                    .offset((page - 1) * per_page)
                    .limit(per_page)
                    .all(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                (items, total)
            }
            None => {
                let paginator = select.paginate(self.db.as_ref(), per_page);
                let total = paginator
                    .num_items()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                let items = paginator
                    .fetch_page(page - 1)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                (items, total)
            }
        };

        Ok(Page {
            items,
            page,
            per_page,
            total_entries,
        })
    }

    /// Create a new image.
    ///
    /// A taken `(external_identifier, user_id)` pair is a `Conflict`.
    pub async fn create(&self, model: image::ActiveModel) -> AppResult<image::Model> {
        model.insert(self.db.as_ref()).await.map_err(write_error)
    }

    /// Create an image and bump its owner's `images_count` in one transaction.
    ///
    /// A taken `(external_identifier, user_id)` pair is a `Conflict` and
    /// leaves the counter untouched.
    pub async fn create_for_user(&self, model: image::ActiveModel) -> AppResult<image::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = model.insert(&txn).await.map_err(write_error)?;

        User::update_many()
            .col_expr(
                user::Column::ImagesCount,
                Expr::col(user::Column::ImagesCount).add(1),
            )
            .filter(user::Column::Id.eq(&created.user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Update an image.
    pub async fn update(&self, model: image::ActiveModel) -> AppResult<image::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record the outcome of a media health check.
    ///
    /// A failed check increments `failed_file_checks`; at the limit the image
    /// drops out of every visible scope.
    pub async fn record_file_check(&self, id: &str, passed: bool) -> AppResult<()> {
        let mut update = Image::update_many()
            .col_expr(image::Column::FileLastChecked, Expr::value(Utc::now()));

        if !passed {
            update = update.col_expr(
                image::Column::FailedFileChecks,
                Expr::col(image::Column::FailedFileChecks).add(1),
            );
        }

        let result = update
            .filter(image::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::ImageNotFound(id.to_string()));
        }

        Ok(())
    }
}
