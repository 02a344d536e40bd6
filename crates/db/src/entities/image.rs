//! Image entity.

use lentil_common::{
    CodecError, MediaSize, emoji,
    media_url::{self, secure_url_opt},
    metadata,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Images with this many failed file checks are hidden from every feed.
pub const FAILED_FILE_CHECK_LIMIT: i32 = 3;

/// Moderation state of an image.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
pub enum ImageState {
    #[sea_orm(num_value = 0)]
    #[default]
    Pending,
    #[sea_orm(num_value = 1)]
    Approved,
    #[sea_orm(num_value = 2)]
    Rejected,
}

impl ImageState {
    /// State name as shown to moderators.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ImageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image entity - a harvested photo awaiting or past moderation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user ID.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Caption, stored with emoji tokenized.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Source permalink (http or https).
    pub url: String,

    /// Expanded source URL.
    #[sea_orm(nullable)]
    pub long_url: Option<String>,

    /// Identifier of the image at the source service, unique per user.
    pub external_identifier: String,

    /// Video URL for video posts.
    #[sea_orm(nullable)]
    pub video_url: Option<String>,

    /// When the image was taken or posted at the source.
    #[sea_orm(nullable)]
    pub original_datetime: Option<DateTimeWithTimeZone>,

    /// Source metadata, stored as emoji-tokenized JSON.
    #[sea_orm(column_type = "Text", nullable)]
    pub original_metadata: Option<String>,

    /// Moderation state.
    pub state: ImageState,

    /// Admin user who last moderated the image.
    #[sea_orm(nullable)]
    pub moderator_id: Option<String>,

    /// When the image was last moderated.
    #[sea_orm(nullable)]
    pub moderated_at: Option<DateTimeWithTimeZone>,

    /// Whether the image went through a second moderation pass.
    #[sea_orm(default_value = false)]
    pub second_moderation: bool,

    /// Whether staff picked this image.
    #[sea_orm(default_value = false)]
    pub staff_like: bool,

    /// Hidden from the public approved listing while still approved.
    #[sea_orm(default_value = false)]
    pub suppressed: bool,

    /// Owner asked not to be asked for a donation.
    #[sea_orm(default_value = false)]
    pub do_not_request_donation: bool,

    /// Number of like votes.
    #[sea_orm(default_value = 0)]
    pub like_votes_count: i32,

    /// Number of battles won.
    #[sea_orm(default_value = 0)]
    pub wins_count: i32,

    /// Number of battles lost.
    #[sea_orm(default_value = 0)]
    pub losses_count: i32,

    /// Share of battles won.
    #[sea_orm(nullable)]
    pub win_pct: Option<f64>,

    /// Ranking score for the popular feed.
    #[sea_orm(default_value = 0)]
    pub popular_score: i32,

    #[sea_orm(nullable)]
    pub file_harvested_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(default_value = 0)]
    pub file_harvest_failed: i32,

    #[sea_orm(nullable)]
    pub donor_agreement_submitted_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(default_value = 0)]
    pub donor_agreement_failed: i32,

    #[sea_orm(nullable)]
    pub donor_agreement_rejected: Option<DateTimeWithTimeZone>,

    /// Failed media health checks; see [`FAILED_FILE_CHECK_LIMIT`].
    #[sea_orm(default_value = 0)]
    pub failed_file_checks: i32,

    #[sea_orm(nullable)]
    pub file_last_checked: Option<DateTimeWithTimeZone>,

    /// When the image was created.
    pub created_at: DateTimeWithTimeZone,

    /// When the image was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::admin_user::Entity",
        from = "Column::ModeratorId",
        to = "super::admin_user::Column::Id",
        on_delete = "SetNull"
    )]
    Moderator,
    #[sea_orm(has_many = "super::like_vote::Entity")]
    LikeVotes,
    #[sea_orm(has_many = "super::flag::Entity")]
    Flags,
    #[sea_orm(has_many = "super::tagging::Entity")]
    Taggings,
    #[sea_orm(has_many = "super::licensing::Entity")]
    Licensings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::admin_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Moderator.def()
    }
}

impl Related<super::like_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LikeVotes.def()
    }
}

impl Related<super::flag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flags.def()
    }
}

impl Related<super::tagging::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Taggings.def()
    }
}

impl Related<super::licensing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Licensings.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::tagging::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tagging::Relation::Image.def().rev())
    }
}

impl Related<super::license::Entity> for Entity {
    fn to() -> RelationDef {
        super::licensing::Relation::License.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::licensing::Relation::Image.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the image passes the file-health quality gate.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.failed_file_checks < FAILED_FILE_CHECK_LIMIT
    }

    /// Total number of battles fought.
    #[must_use]
    pub const fn battles_count(&self) -> i32 {
        self.wins_count + self.losses_count
    }

    /// Caption with emoji restored.
    #[must_use]
    pub fn description_text(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(|d| emoji::detokenize(d).into_owned())
    }

    /// Decoded source metadata.
    pub fn metadata(&self) -> Result<Option<Json>, CodecError> {
        metadata::decode_opt(self.original_metadata.as_deref())
    }

    /// Source URL with the secure host applied.
    #[must_use]
    pub fn secure_url(&self) -> String {
        media_url::secure_url(&self.url).into_owned()
    }

    /// URL of the large variant.
    #[must_use]
    pub fn large_url(&self, secure: bool) -> String {
        media_url::media_url(&self.url, MediaSize::Large, secure)
    }

    /// URL of the medium variant.
    #[must_use]
    pub fn medium_url(&self, secure: bool) -> String {
        media_url::media_url(&self.url, MediaSize::Medium, secure)
    }

    /// URL of the thumbnail variant.
    #[must_use]
    pub fn thumbnail_url(&self, secure: bool) -> String {
        media_url::media_url(&self.url, MediaSize::Thumbnail, secure)
    }

    /// Legacy alias for the secure large URL.
    #[must_use]
    pub fn image_url(&self) -> String {
        self.large_url(true)
    }

    /// Legacy alias for the secure large URL.
    #[must_use]
    pub fn jpeg(&self) -> String {
        self.large_url(true)
    }

    /// Video URL with the secure host applied.
    #[must_use]
    pub fn secure_video_url(&self) -> Option<String> {
        secure_url_opt(self.video_url.as_deref())
    }
}
