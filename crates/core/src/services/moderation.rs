//! Moderation service for approving and rejecting images.

use std::fmt;
use std::str::FromStr;

use lentil_common::{AppError, AppResult};
use lentil_db::{
    entities::image,
    repositories::{ImageRepository, UserRepository},
    scope::VisibleImages,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use lentil_db::entities::image::ImageState;

/// A moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationEvent {
    Approve,
    Reject,
}

impl ModerationEvent {
    /// Event name as submitted by moderators.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for ModerationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationEvent {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(AppError::InvalidEvent(other.to_string())),
        }
    }
}

/// Next state after `event`. Both events are accepted from every state.
#[must_use]
pub const fn transition(_state: ImageState, event: ModerationEvent) -> ImageState {
    match event {
        ModerationEvent::Approve => ImageState::Approved,
        ModerationEvent::Reject => ImageState::Rejected,
    }
}

/// Input for moderating an image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateInput {
    pub event: ModerationEvent,
    /// Marks the decision as a second moderation pass.
    #[serde(default)]
    pub second_moderation: bool,
    /// Sets or clears the staff pick flag along with the decision.
    #[serde(default)]
    pub staff_like: Option<bool>,
}

impl From<ModerationEvent> for ModerateInput {
    fn from(event: ModerationEvent) -> Self {
        Self {
            event,
            second_moderation: false,
            staff_like: None,
        }
    }
}

/// Moderation service.
///
/// Concurrent decisions on the same image are last-write-wins.
#[derive(Clone)]
pub struct ModerationService {
    image_repo: ImageRepository,
    user_repo: UserRepository,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(image_repo: ImageRepository, user_repo: UserRepository) -> Self {
        Self {
            image_repo,
            user_repo,
        }
    }

    /// Apply a moderation decision and stamp the moderator.
    pub async fn moderate(
        &self,
        image_id: &str,
        moderator_id: &str,
        input: ModerateInput,
    ) -> AppResult<image::Model> {
        self.user_repo.get_admin_by_id(moderator_id).await?;
        let image = self.image_repo.get_by_id(image_id).await?;

        let previous = image.state;
        let next = transition(previous, input.event);
        let now = chrono::Utc::now();

        let mut active: image::ActiveModel = image.into();
        active.state = Set(next);
        active.moderator_id = Set(Some(moderator_id.to_string()));
        active.moderated_at = Set(Some(now.into()));
        active.updated_at = Set(Some(now.into()));
        if input.second_moderation {
            active.second_moderation = Set(true);
        }
        if let Some(staff_like) = input.staff_like {
            active.staff_like = Set(staff_like);
        }

        let updated = self.image_repo.update(active).await?;

        info!(
            image_id = %image_id,
            moderator_id = %moderator_id,
            event = %input.event,
            from = %previous,
            to = %next,
            "Image moderated"
        );

        Ok(updated)
    }

    /// Apply a moderation decision given by name.
    pub async fn moderate_by_name(
        &self,
        image_id: &str,
        moderator_id: &str,
        event: &str,
    ) -> AppResult<image::Model> {
        let event: ModerationEvent = event.parse()?;
        self.moderate(image_id, moderator_id, event.into()).await
    }

    /// Approve an image.
    pub async fn approve(&self, image_id: &str, moderator_id: &str) -> AppResult<image::Model> {
        self.moderate(image_id, moderator_id, ModerationEvent::Approve.into())
            .await
    }

    /// Reject an image.
    pub async fn reject(&self, image_id: &str, moderator_id: &str) -> AppResult<image::Model> {
        self.moderate(image_id, moderator_id, ModerationEvent::Reject.into())
            .await
    }

    /// Images awaiting a first decision, oldest first.
    pub async fn pending_queue(&self, limit: u64, offset: u64) -> AppResult<Vec<image::Model>> {
        self.image_repo
            .find(VisibleImages::new().pending(), limit, offset)
            .await
    }

    /// Flagged images that have not had a second moderation, oldest first.
    pub async fn second_moderation_queue(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<image::Model>> {
        self.image_repo
            .find(
                VisibleImages::new().flagged_for_second_moderation(),
                limit,
                offset,
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::image;
    use chrono::Utc;
    use lentil_db::entities::admin_user;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn admin(id: &str) -> admin_user::Model {
        admin_user::Model {
            id: id.to_string(),
            email: format!("{id}@library.example"),
            created_at: Utc::now().into(),
        }
    }

    fn service(db: MockDatabase) -> ModerationService {
        let db = Arc::new(db.into_connection());
        ModerationService::new(
            ImageRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    #[test]
    fn test_event_from_str() {
        assert_eq!(
            "approve".parse::<ModerationEvent>().unwrap(),
            ModerationEvent::Approve
        );
        assert_eq!(
            "reject".parse::<ModerationEvent>().unwrap(),
            ModerationEvent::Reject
        );
        assert!(matches!(
            "publish".parse::<ModerationEvent>(),
            Err(AppError::InvalidEvent(name)) if name == "publish"
        ));
    }

    #[test]
    fn test_transition_from_every_state() {
        for state in [
            ImageState::Pending,
            ImageState::Approved,
            ImageState::Rejected,
        ] {
            assert_eq!(
                transition(state, ModerationEvent::Approve),
                ImageState::Approved
            );
            assert_eq!(
                transition(state, ModerationEvent::Reject),
                ImageState::Rejected
            );
        }
    }

    #[test]
    fn test_input_deserialize() {
        let input: ModerateInput =
            serde_json::from_str(r#"{"event":"reject","secondModeration":true}"#).unwrap();
        assert_eq!(input.event, ModerationEvent::Reject);
        assert!(input.second_moderation);
        assert_eq!(input.staff_like, None);
    }

    #[tokio::test]
    async fn test_approve_stamps_moderator() {
        let pending = image("img1");
        let mut approved = pending.clone();
        approved.state = ImageState::Approved;
        approved.moderator_id = Some("mod1".to_string());
        approved.moderated_at = Some(Utc::now().into());

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin("mod1")]])
                .append_query_results([[pending]])
                .append_query_results([[approved]]),
        );

        let result = service.approve("img1", "mod1").await.unwrap();

        assert_eq!(result.state, ImageState::Approved);
        assert_eq!(result.moderator_id.as_deref(), Some("mod1"));
        assert!(result.moderated_at.is_some());
    }

    #[tokio::test]
    async fn test_moderate_unknown_moderator() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<admin_user::Model>::new()]),
        );

        let result = service.reject("img1", "ghost").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_moderate_hidden_image() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin("mod1")]])
                .append_query_results([Vec::<image::Model>::new()]),
        );

        let result = service.approve("broken", "mod1").await;
        assert!(matches!(result, Err(AppError::ImageNotFound(_))));
    }

    #[tokio::test]
    async fn test_moderate_by_name_rejects_unknown_event() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.moderate_by_name("img1", "mod1", "delete").await;
        assert!(matches!(result, Err(AppError::InvalidEvent(_))));
    }
}
