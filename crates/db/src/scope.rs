//! Image query scopes.
//!
//! [`VisibleImages`] is the only way repositories accept an image listing,
//! and it can only be built with the file-health gate already applied.

use sea_orm::{
    ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Select,
    sea_query::{NullOrdering, Query},
};

use crate::entities::{
    Flag, Image, flag,
    image::{self, FAILED_FILE_CHECK_LIMIT, ImageState},
};

/// Images that pass the quality gate (`failed_file_checks < 3`).
#[derive(Debug, Clone)]
pub struct VisibleImages {
    select: Select<Image>,
}

impl Default for VisibleImages {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibleImages {
    /// All visible images, unordered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            select: Image::find()
                .filter(image::Column::FailedFileChecks.lt(FAILED_FILE_CHECK_LIMIT)),
        }
    }

    fn map(self, f: impl FnOnce(Select<Image>) -> Select<Image>) -> Self {
        Self {
            select: f(self.select),
        }
    }

    /// Newest first by `original_datetime`.
    #[must_use]
    pub fn recent(self) -> Self {
        self.map(|s| {
            s.order_by_with_nulls(
                image::Column::OriginalDatetime,
                Order::Desc,
                NullOrdering::Last,
            )
            .order_by_desc(image::Column::Id)
        })
    }

    /// Staff picks, newest first.
    #[must_use]
    pub fn staff_picks(self) -> Self {
        self.map(|s| s.filter(image::Column::StaffLike.eq(true)))
            .recent()
    }

    /// Highest `popular_score` first, then most liked.
    #[must_use]
    pub fn popular(self) -> Self {
        self.map(|s| {
            s.order_by_desc(image::Column::PopularScore)
                .order_by_desc(image::Column::LikeVotesCount)
        })
    }

    /// Approved and not suppressed.
    #[must_use]
    pub fn approved(self) -> Self {
        self.approved_all()
            .map(|s| s.filter(image::Column::Suppressed.eq(false)))
    }

    /// Approved, including suppressed images.
    #[must_use]
    pub fn approved_all(self) -> Self {
        self.map(|s| s.filter(image::Column::State.eq(ImageState::Approved)))
    }

    /// Awaiting first moderation, oldest first.
    #[must_use]
    pub fn pending(self) -> Self {
        self.map(|s| {
            s.filter(image::Column::State.eq(ImageState::Pending))
                .order_by_asc(image::Column::CreatedAt)
        })
    }

    /// Flagged at least once and not yet given a second moderation.
    #[must_use]
    pub fn flagged_for_second_moderation(self) -> Self {
        self.map(|s| {
            s.filter(image::Column::SecondModeration.eq(false))
                .filter(
                    image::Column::Id.in_subquery(
                        Query::select()
                            .column(flag::Column::ImageId)
                            .from(Flag)
                            .to_owned(),
                    ),
                )
                .order_by_asc(image::Column::CreatedAt)
        })
    }

    /// Owned by one user.
    #[must_use]
    pub fn owned_by(self, user_id: &str) -> Self {
        let user_id = user_id.to_string();
        self.map(|s| s.filter(image::Column::UserId.eq(user_id)))
    }

    /// With the given ID.
    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        let id = id.to_string();
        self.map(|s| s.filter(image::Column::Id.eq(id)))
    }

    pub(crate) fn into_select(self) -> Select<Image> {
        self.select
    }
}
