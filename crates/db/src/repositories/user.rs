//! User repository.

use std::sync::Arc;

use crate::entities::{AdminUser, User, admin_user, user};
use lentil_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// User repository for database operations.
///
/// Also resolves admin users, who only appear as moderators.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User: {id}")))
    }

    /// Find a user by user name.
    pub async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::UserName.eq(user_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an admin user by ID, returning an error if not found.
    pub async fn get_admin_by_id(&self, id: &str) -> AppResult<admin_user::Model> {
        AdminUser::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Admin user: {id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            user_name: format!("{id}_name"),
            full_name: None,
            images_count: 4,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user("user1")]])
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert_eq!(repo.get_by_id("user1").await.unwrap().images_count, 4);
        assert!(matches!(
            repo.get_by_id("nobody").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_admin_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<admin_user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert!(matches!(
            repo.get_admin_by_id("mod1").await,
            Err(AppError::NotFound(_))
        ));
    }
}
