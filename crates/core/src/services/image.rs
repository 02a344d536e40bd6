//! Image service: creation, stored text, tags and licenses.

use lentil_common::{AppError, AppResult, IdGenerator, emoji, metadata};
use lentil_db::{
    entities::{image, license, tag, tagging},
    repositories::{ImageRepository, LicenseRepository, TagRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;
use validator::Validate;

use super::tags;

pub use lentil_db::entities::image::ImageState;

/// Input for creating an image.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageInput {
    #[validate(length(min = 1, max = 255))]
    pub url: String,
    #[validate(length(min = 1, max = 255))]
    pub external_identifier: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub long_url: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub video_url: Option<String>,
    #[serde(default)]
    pub original_datetime: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub original_metadata: Option<Value>,
    #[serde(default)]
    pub do_not_request_donation: bool,
}

/// Response for an image.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: String,
    pub user_id: String,
    pub description: Option<String>,
    pub url: String,
    pub secure_url: String,
    pub large_url: String,
    pub medium_url: String,
    pub thumbnail_url: String,
    pub video_url: Option<String>,
    pub long_url: Option<String>,
    pub external_identifier: String,
    pub original_datetime: Option<String>,
    pub state: ImageState,
    pub staff_like: bool,
    pub like_votes_count: i32,
    pub wins_count: i32,
    pub losses_count: i32,
    pub battles_count: i32,
    pub win_pct: Option<f64>,
    pub popular_score: i32,
    pub created_at: String,
}

impl From<image::Model> for ImageResponse {
    fn from(m: image::Model) -> Self {
        Self {
            description: m.description_text(),
            secure_url: m.secure_url(),
            large_url: m.large_url(true),
            medium_url: m.medium_url(true),
            thumbnail_url: m.thumbnail_url(true),
            video_url: m.secure_video_url(),
            battles_count: m.battles_count(),
            original_datetime: m.original_datetime.map(|t| t.to_rfc3339()),
            created_at: m.created_at.to_rfc3339(),
            id: m.id,
            user_id: m.user_id,
            url: m.url,
            long_url: m.long_url,
            external_identifier: m.external_identifier,
            state: m.state,
            staff_like: m.staff_like,
            like_votes_count: m.like_votes_count,
            wins_count: m.wins_count,
            losses_count: m.losses_count,
            win_pct: m.win_pct,
            popular_score: m.popular_score,
        }
    }
}

/// Check that a source URL is an absolute http or https URL.
pub fn validate_source_url(raw: &str) -> AppResult<()> {
    let parsed =
        Url::parse(raw).map_err(|e| AppError::Validation(format!("Invalid URL {raw}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::Validation(format!(
            "URL scheme must be http or https, got {scheme}"
        ))),
    }
}

/// Image service.
#[derive(Clone)]
pub struct ImageService {
    image_repo: ImageRepository,
    tag_repo: TagRepository,
    license_repo: LicenseRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ImageService {
    /// Create a new image service.
    #[must_use]
    pub const fn new(
        image_repo: ImageRepository,
        tag_repo: TagRepository,
        license_repo: LicenseRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            image_repo,
            tag_repo,
            license_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a pending image for a user.
    pub async fn create(&self, user_id: &str, input: CreateImageInput) -> AppResult<image::Model> {
        input.validate()?;
        validate_source_url(&input.url)?;
        for url in [&input.long_url, &input.video_url].into_iter().flatten() {
            validate_source_url(url)?;
        }

        self.user_repo.get_by_id(user_id).await?;

        let taken = || {
            AppError::Validation(format!(
                "External identifier {} has already been taken",
                input.external_identifier
            ))
        };

        if self
            .image_repo
            .find_by_external_identifier(user_id, &input.external_identifier)
            .await?
            .is_some()
        {
            return Err(taken());
        }

        let original_metadata = input
            .original_metadata
            .as_ref()
            .map(metadata::encode)
            .transpose()?;
        let description = input
            .description
            .as_deref()
            .map(|d| emoji::tokenize(d).into_owned());

        let model = image::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            description: Set(description),
            url: Set(input.url),
            long_url: Set(input.long_url),
            external_identifier: Set(input.external_identifier.clone()),
            video_url: Set(input.video_url),
            original_datetime: Set(input.original_datetime.map(Into::into)),
            original_metadata: Set(original_metadata),
            state: Set(ImageState::Pending),
            moderator_id: Set(None),
            moderated_at: Set(None),
            second_moderation: Set(false),
            staff_like: Set(false),
            suppressed: Set(false),
            do_not_request_donation: Set(input.do_not_request_donation),
            like_votes_count: Set(0),
            wins_count: Set(0),
            losses_count: Set(0),
            win_pct: Set(None),
            popular_score: Set(0),
            file_harvested_date: Set(None),
            file_harvest_failed: Set(0),
            donor_agreement_submitted_date: Set(None),
            donor_agreement_failed: Set(0),
            donor_agreement_rejected: Set(None),
            failed_file_checks: Set(0),
            file_last_checked: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self
            .image_repo
            .create_for_user(model)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => taken(),
                e => e,
            })?;

        info!(image_id = %created.id, user_id = %user_id, "Image created");

        Ok(created)
    }

    /// Get a visible image by ID.
    pub async fn get(&self, id: &str) -> AppResult<image::Model> {
        self.image_repo.get_by_id(id).await
    }

    /// Decoded source metadata of an image.
    pub async fn metadata(&self, id: &str) -> AppResult<Option<Value>> {
        let image = self.image_repo.get_by_id(id).await?;
        Ok(image.metadata()?)
    }

    /// Replace the source metadata of an image.
    pub async fn set_original_metadata(&self, id: &str, meta: &Value) -> AppResult<image::Model> {
        let encoded = metadata::encode(meta)?;
        let image = self.image_repo.get_by_id(id).await?;

        let mut active: image::ActiveModel = image.into();
        active.original_metadata = Set(Some(encoded));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.image_repo.update(active).await
    }

    /// Replace the caption of an image.
    pub async fn set_description(
        &self,
        id: &str,
        description: Option<&str>,
    ) -> AppResult<image::Model> {
        let image = self.image_repo.get_by_id(id).await?;

        let mut active: image::ActiveModel = image.into();
        active.description = Set(description.map(|d| emoji::tokenize(d).into_owned()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.image_repo.update(active).await
    }

    async fn taggings(&self, image_id: &str) -> Option<Vec<(tagging::Model, tag::Model)>> {
        match self.tag_repo.find_taggings_with_tags(image_id).await {
            Ok(taggings) => Some(taggings),
            Err(e) => {
                error!(image_id = %image_id, error = %e, "Error retrieving taggings");
                None
            }
        }
    }

    /// Tags attached by the source service. Empty if the lookup fails.
    pub async fn service_tags(&self, image_id: &str) -> Vec<tag::Model> {
        self.taggings(image_id)
            .await
            .map(|t| tags::service_picked_tags(&t))
            .unwrap_or_default()
    }

    /// Tags attached by staff. Empty if the lookup fails.
    pub async fn staff_tags(&self, image_id: &str) -> Vec<tag::Model> {
        self.taggings(image_id)
            .await
            .map(|t| tags::staff_picked_tags(&t))
            .unwrap_or_default()
    }

    /// Tags staff can still attach. Empty if a lookup fails.
    pub async fn available_staff_tags(&self, image_id: &str) -> Vec<tag::Model> {
        let all_tags = match self.tag_repo.find_all().await {
            Ok(all_tags) => all_tags,
            Err(e) => {
                error!(error = %e, "Error retrieving tags");
                return Vec::new();
            }
        };
        let Some(taggings) = self.taggings(image_id).await else {
            return Vec::new();
        };

        tags::available_staff_tags(
            all_tags,
            &tags::distinct_tags(&taggings),
            &tags::staff_picked_tags(&taggings),
        )
    }

    /// Attach a tag by name, creating the tag if needed.
    pub async fn add_tag(
        &self,
        image_id: &str,
        name: &str,
        staff_tag: bool,
    ) -> AppResult<tagging::Model> {
        let name = name.trim();
        if name.is_empty() || name.len() > 128 {
            return Err(AppError::Validation(
                "Tag name must be between 1 and 128 characters".to_string(),
            ));
        }

        self.image_repo.get_by_id(image_id).await?;

        let tag = match self.tag_repo.find_by_name(name).await? {
            Some(tag) => tag,
            None => {
                self.tag_repo
                    .create(tag::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        name: Set(name.to_string()),
                        created_at: Set(chrono::Utc::now().into()),
                    })
                    .await?
            }
        };

        self.tag_repo
            .add_tagging(tagging::ActiveModel {
                id: Set(self.id_gen.generate()),
                image_id: Set(image_id.to_string()),
                tag_id: Set(tag.id),
                staff_tag: Set(staff_tag),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await
    }

    /// Detach a tag by name. Unknown names are a no-op.
    pub async fn remove_tag(&self, image_id: &str, name: &str, staff_tag: bool) -> AppResult<()> {
        if let Some(tag) = self.tag_repo.find_by_name(name.trim()).await? {
            self.tag_repo
                .remove_tagging(image_id, &tag.id, staff_tag)
                .await?;
        }
        Ok(())
    }

    /// Licenses granted for an image.
    pub async fn licenses(&self, image_id: &str) -> AppResult<Vec<license::Model>> {
        self.license_repo.find_for_image(image_id).await
    }

    /// Grant a license, by short name, for an image.
    pub async fn grant_license(&self, image_id: &str, short_name: &str) -> AppResult<()> {
        self.image_repo.get_by_id(image_id).await?;
        let license = self
            .license_repo
            .find_by_short_name(short_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("License: {short_name}")))?;

        self.license_repo
            .grant(lentil_db::entities::licensing::ActiveModel {
                id: Set(self.id_gen.generate()),
                image_id: Set(image_id.to_string()),
                license_id: Set(license.id),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        Ok(())
    }

    /// Record the outcome of a media health check.
    pub async fn record_file_check(&self, image_id: &str, passed: bool) -> AppResult<()> {
        self.image_repo.record_file_check(image_id, passed).await?;
        if !passed {
            warn!(image_id = %image_id, "Media file check failed");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::image;
    use chrono::Utc;
    use lentil_db::entities::user;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
    use serde_json::json;
    use std::sync::Arc;

    fn service(db: MockDatabase) -> ImageService {
        let db = Arc::new(db.into_connection());
        ImageService::new(
            ImageRepository::new(Arc::clone(&db)),
            TagRepository::new(Arc::clone(&db)),
            LicenseRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    fn user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            user_name: format!("{id}_name"),
            full_name: None,
            images_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn tag(id: &str, name: &str) -> tag::Model {
        tag::Model {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn tagged(tag: &tag::Model, staff_tag: bool) -> (tagging::Model, tag::Model) {
        (
            tagging::Model {
                id: format!("{}_{staff_tag}", tag.id),
                image_id: "img1".to_string(),
                tag_id: tag.id.clone(),
                staff_tag,
                created_at: Utc::now().into(),
            },
            tag.clone(),
        )
    }

    fn input(url: &str) -> CreateImageInput {
        CreateImageInput {
            url: url.to_string(),
            external_identifier: "ig_123".to_string(),
            description: Some("Reading room 📚".to_string()),
            long_url: None,
            video_url: None,
            original_datetime: None,
            original_metadata: Some(json!({ "caption": "📚", "likes": 3 })),
            do_not_request_donation: false,
        }
    }

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_url("http://instagr.am/p/abc/").is_ok());
        assert!(validate_source_url("https://example.com/photo").is_ok());
        assert!(matches!(
            validate_source_url("ftp://example.com/photo"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_source_url("not a url"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_response_from_model() {
        let mut model = image("abc");
        model.description = Some("Stacks {U+1F4DA}".to_string());
        model.wins_count = 2;
        model.losses_count = 1;

        let response = ImageResponse::from(model);

        assert_eq!(response.description.as_deref(), Some("Stacks 📚"));
        assert_eq!(response.large_url, "https://instagram.com/p/abc/media/?size=l");
        assert_eq!(response.battles_count, 3);
    }

    #[tokio::test]
    async fn test_create() {
        let mut created = image("new");
        created.description = Some("Reading room {U+1F4DA}".to_string());

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user("user1")]])
                .append_query_results([Vec::<image::Model>::new()])
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );

        let result = service
            .create("user1", input("http://instagr.am/p/new/"))
            .await
            .unwrap();

        assert_eq!(result.state, ImageState::Pending);
        assert_eq!(result.description_text().as_deref(), Some("Reading room 📚"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_scheme() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.create("user1", input("javascript:alert(1)")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_identifier() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user("user1")]])
                .append_query_results([[image("existing")]]),
        );

        let result = service
            .create("user1", input("https://instagram.com/p/dup/"))
            .await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("ig_123")));
    }

    #[tokio::test]
    async fn test_create_rejects_urls_longer_than_column() {
        let long = format!("https://instagram.com/p/{}/", "a".repeat(240));
        assert!(long.len() > 255);

        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let result = service.create("user1", input(&long)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let mut with_long_video = input("https://instagram.com/p/ok/");
        with_long_video.video_url = Some(long);
        let result = service.create("user1", with_long_video).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_video_scheme() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let mut bad = input("https://instagram.com/p/ok/");
        bad.video_url = Some("file:///etc/passwd".to_string());

        let result = service.create("user1", bad).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_racing_duplicate_is_validation_error() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user("user1")]])
                .append_query_results([Vec::<image::Model>::new()])
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "duplicate key value violates unique constraint \
                     \"idx_image_external_identifier_user\""
                        .to_string(),
                ))]),
        );

        let result = service
            .create("user1", input("https://instagram.com/p/race/"))
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("ig_123"));
    }

    #[tokio::test]
    async fn test_metadata_malformed_is_error() {
        let mut broken = image("img1");
        broken.original_metadata = Some("{not json".to_string());

        let service =
            service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[broken]]));

        let result = service.metadata("img1").await;
        assert!(matches!(result, Err(AppError::Codec(_))));
    }

    #[tokio::test]
    async fn test_tag_accessors() {
        let library = tag("t1", "library");
        let books = tag("t2", "books");
        let rows = || vec![tagged(&library, false), tagged(&books, true)];

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows()])
                .append_query_results([rows()]),
        );

        let service_tags = service.service_tags("img1").await;
        assert_eq!(service_tags.len(), 1);
        assert_eq!(service_tags[0].name, "library");

        let staff_tags = service.staff_tags("img1").await;
        assert_eq!(staff_tags.len(), 1);
        assert_eq!(staff_tags[0].name, "books");
    }

    #[tokio::test]
    async fn test_tag_lookup_failure_degrades_to_empty() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".to_string())]),
        );

        assert!(service.service_tags("img1").await.is_empty());
    }

    #[tokio::test]
    async fn test_available_staff_tags() {
        let library = tag("t1", "library");
        let books = tag("t2", "books");
        let campus = tag("t3", "campus");

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![books.clone(), campus.clone(), library.clone()]])
                .append_query_results([vec![tagged(&library, false), tagged(&books, true)]]),
        );

        let available = service.available_staff_tags("img1").await;
        let names: Vec<&str> = available.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["books", "campus"]);
    }

    #[tokio::test]
    async fn test_add_tag_rejects_blank_name() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.add_tag("img1", "   ", true).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
