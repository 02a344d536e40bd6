//! Like vote repository.

use std::sync::Arc;

use super::write_error;
use crate::entities::{Image, LikeVote, image, like_vote};
use lentil_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait, sea_query::Expr,
};

/// Like vote repository for database operations.
#[derive(Clone)]
pub struct LikeVoteRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeVoteRepository {
    /// Create a new like vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether a user already liked an image.
    pub async fn has_liked(&self, image_id: &str, user_id: &str) -> AppResult<bool> {
        let count = LikeVote::find()
            .filter(like_vote::Column::ImageId.eq(image_id))
            .filter(like_vote::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Store a like vote and bump the image's `like_votes_count` in one
    /// transaction.
    ///
    /// A second vote from the same user is a `Conflict` and leaves the
    /// counter untouched.
    pub async fn record(&self, model: like_vote::ActiveModel) -> AppResult<like_vote::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let vote = model.insert(&txn).await.map_err(write_error)?;

        Image::update_many()
            .col_expr(
                image::Column::LikeVotesCount,
                Expr::col(image::Column::LikeVotesCount).add(1),
            )
            .filter(image::Column::Id.eq(&vote.image_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(vote)
    }
}
