//! Battle repository.

use std::sync::Arc;

use crate::entities::{Battle, Image, battle, image};
use lentil_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};

/// Battle repository for database operations.
#[derive(Clone)]
pub struct BattleRepository {
    db: Arc<DatabaseConnection>,
}

impl BattleRepository {
    /// Create a new battle repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Battles an image took part in, won or lost, newest first.
    pub async fn find_for_image(&self, image_id: &str) -> AppResult<Vec<battle::Model>> {
        Battle::find()
            .filter(
                Condition::any()
                    .add(battle::Column::ImageId.eq(image_id))
                    .add(battle::Column::LoserId.eq(image_id)),
            )
            .order_by_desc(battle::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a battle and update both images' counters.
    ///
    /// `win_pct` is recomputed from the pre-update counters in the same
    /// statement that increments them.
    pub async fn record(&self, model: battle::ActiveModel) -> AppResult<()> {
        let winner_id = model
            .image_id
            .clone()
            .take()
            .ok_or_else(|| AppError::Internal("Battle without winner".to_string()))?;
        let loser_id = model
            .loser_id
            .clone()
            .take()
            .ok_or_else(|| AppError::Internal("Battle without loser".to_string()))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Battle::insert(model)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Image::update_many()
            .col_expr(
                image::Column::WinPct,
                Expr::cust(
                    "(wins_count + 1)::double precision / (wins_count + losses_count + 1)",
                ),
            )
            .col_expr(
                image::Column::WinsCount,
                Expr::col(image::Column::WinsCount).add(1),
            )
            .filter(image::Column::Id.eq(&winner_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Image::update_many()
            .col_expr(
                image::Column::WinPct,
                Expr::cust("wins_count::double precision / (wins_count + losses_count + 1)"),
            )
            .col_expr(
                image::Column::LossesCount,
                Expr::col(image::Column::LossesCount).add(1),
            )
            .filter(image::Column::Id.eq(&loser_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
