//! Voting service: likes, battles and flags.

use lentil_common::{AppError, AppResult, IdGenerator};
use lentil_db::{
    entities::{battle, flag, like_vote},
    repositories::{BattleRepository, FlagRepository, ImageRepository, LikeVoteRepository},
};
use sea_orm::Set;
use tracing::info;

/// Voting service.
#[derive(Clone)]
pub struct VotingService {
    image_repo: ImageRepository,
    battle_repo: BattleRepository,
    like_vote_repo: LikeVoteRepository,
    flag_repo: FlagRepository,
    id_gen: IdGenerator,
}

impl VotingService {
    /// Create a new voting service.
    #[must_use]
    pub const fn new(
        image_repo: ImageRepository,
        battle_repo: BattleRepository,
        like_vote_repo: LikeVoteRepository,
        flag_repo: FlagRepository,
    ) -> Self {
        Self {
            image_repo,
            battle_repo,
            like_vote_repo,
            flag_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like an image. Each user may like an image once.
    pub async fn like(&self, image_id: &str, user_id: &str) -> AppResult<like_vote::Model> {
        self.image_repo.get_by_id(image_id).await?;

        let already_liked =
            || AppError::Conflict(format!("User {user_id} already liked image {image_id}"));

        if self.like_vote_repo.has_liked(image_id, user_id).await? {
            return Err(already_liked());
        }

        self.like_vote_repo
            .record(like_vote::ActiveModel {
                id: Set(self.id_gen.generate()),
                image_id: Set(image_id.to_string()),
                user_id: Set(user_id.to_string()),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => already_liked(),
                e => e,
            })
    }

    /// Battles an image took part in, won or lost.
    pub async fn battles(&self, image_id: &str) -> AppResult<Vec<battle::Model>> {
        self.battle_repo.find_for_image(image_id).await
    }

    /// Record that `winner_id` beat `loser_id`.
    pub async fn record_battle(&self, winner_id: &str, loser_id: &str) -> AppResult<()> {
        if winner_id == loser_id {
            return Err(AppError::BadRequest(
                "An image cannot battle itself".to_string(),
            ));
        }

        self.image_repo.get_by_id(winner_id).await?;
        self.image_repo.get_by_id(loser_id).await?;

        self.battle_repo
            .record(battle::ActiveModel {
                id: Set(self.id_gen.generate()),
                image_id: Set(winner_id.to_string()),
                loser_id: Set(loser_id.to_string()),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        info!(winner_id = %winner_id, loser_id = %loser_id, "Battle recorded");

        Ok(())
    }

    /// Flag an image for a second look. Anonymous flags are allowed.
    pub async fn flag(&self, image_id: &str, user_id: Option<&str>) -> AppResult<flag::Model> {
        self.image_repo.get_by_id(image_id).await?;

        let flag = self
            .flag_repo
            .create(flag::ActiveModel {
                id: Set(self.id_gen.generate()),
                image_id: Set(image_id.to_string()),
                user_id: Set(user_id.map(ToString::to_string)),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        info!(image_id = %image_id, "Image flagged");

        Ok(flag)
    }

    /// Number of flags raised against an image.
    pub async fn flag_count(&self, image_id: &str) -> AppResult<u64> {
        self.flag_repo.count_for_image(image_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::image;
    use chrono::Utc;
    use lentil_db::entities::image as image_entity;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr, Value};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> VotingService {
        let db = Arc::new(db.into_connection());
        VotingService::new(
            ImageRepository::new(Arc::clone(&db)),
            BattleRepository::new(Arc::clone(&db)),
            LikeVoteRepository::new(Arc::clone(&db)),
            FlagRepository::new(db),
        )
    }

    fn count(n: i64) -> [std::collections::BTreeMap<&'static str, Value>; 1] {
        [maplit::btreemap! { "num_items" => Into::<Value>::into(n) }]
    }

    fn exec() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn test_like() {
        let vote = like_vote::Model {
            id: "v1".to_string(),
            image_id: "img1".to_string(),
            user_id: "user1".to_string(),
            created_at: Utc::now().into(),
        };

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image("img1")]])
                .append_query_results([count(0)])
                .append_query_results([[vote]])
                .append_exec_results([exec()]),
        );

        let result = service.like("img1", "user1").await.unwrap();
        assert_eq!(result.user_id, "user1");
    }

    #[tokio::test]
    async fn test_like_twice_conflicts() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image("img1")]])
                .append_query_results([count(1)]),
        );

        let result = service.like("img1", "user1").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_like_racing_duplicate_conflicts() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image("img1")]])
                .append_query_results([count(0)])
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "duplicate key value violates unique constraint \"idx_like_vote_unique\""
                        .to_string(),
                ))]),
        );

        let result = service.like("img1", "user1").await;
        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg.contains("user1")));
    }

    #[tokio::test]
    async fn test_record_battle() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image("img1")]])
                .append_query_results([[image("img2")]])
                .append_exec_results([exec(), exec(), exec()]),
        );

        assert!(service.record_battle("img1", "img2").await.is_ok());
    }

    #[tokio::test]
    async fn test_record_battle_against_self() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.record_battle("img1", "img1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_record_battle_hidden_loser() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image("img1")]])
                .append_query_results([Vec::<image_entity::Model>::new()]),
        );

        let result = service.record_battle("img1", "broken").await;
        assert!(matches!(result, Err(AppError::ImageNotFound(id)) if id == "broken"));
    }

    #[tokio::test]
    async fn test_anonymous_flag() {
        let flagged = flag::Model {
            id: "f1".to_string(),
            image_id: "img1".to_string(),
            user_id: None,
            created_at: Utc::now().into(),
        };

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image("img1")]])
                .append_query_results([[flagged]]),
        );

        let result = service.flag("img1", None).await.unwrap();
        assert!(result.user_id.is_none());
    }
}
