//! Feed service: ranked listings and the blended front page.

use std::collections::HashSet;

use lentil_common::{AppResult, FeedConfig};
use lentil_db::{
    entities::image,
    repositories::{ImageRepository, Page},
    scope::VisibleImages,
};
use rand::{Rng, seq::SliceRandom};
use tracing::debug;

/// Merge feed sources into one shuffled list.
///
/// Sources are concatenated in order and deduplicated by image ID, keeping
/// the first occurrence, then shuffled uniformly with `rng`.
pub fn blend_images<R: Rng + ?Sized>(
    popular: Vec<image::Model>,
    recent: Vec<image::Model>,
    staff_picks: Vec<image::Model>,
    rng: &mut R,
) -> Vec<image::Model> {
    let mut seen = HashSet::new();
    let mut blended: Vec<image::Model> = popular
        .into_iter()
        .chain(recent)
        .chain(staff_picks)
        .filter(|img| seen.insert(img.id.clone()))
        .collect();

    blended.shuffle(rng);
    blended
}

/// Feed service.
#[derive(Clone)]
pub struct FeedService {
    image_repo: ImageRepository,
    config: FeedConfig,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(image_repo: ImageRepository, config: FeedConfig) -> Self {
        Self { image_repo, config }
    }

    /// Newest images first.
    pub async fn recent(&self, limit: u64, offset: u64) -> AppResult<Vec<image::Model>> {
        self.image_repo
            .find(VisibleImages::new().recent(), limit, offset)
            .await
    }

    /// Staff picks, newest first.
    pub async fn staff_picks(&self, limit: u64, offset: u64) -> AppResult<Vec<image::Model>> {
        self.image_repo
            .find(VisibleImages::new().staff_picks(), limit, offset)
            .await
    }

    /// Most popular images first.
    pub async fn popular(&self, limit: u64, offset: u64) -> AppResult<Vec<image::Model>> {
        self.image_repo
            .find(VisibleImages::new().popular(), limit, offset)
            .await
    }

    /// Approved, unsuppressed images, newest first.
    pub async fn approved(&self, limit: u64, offset: u64) -> AppResult<Vec<image::Model>> {
        self.image_repo
            .find(VisibleImages::new().approved().recent(), limit, offset)
            .await
    }

    /// Approved images including suppressed ones, newest first.
    pub async fn approved_all(&self, limit: u64, offset: u64) -> AppResult<Vec<image::Model>> {
        self.image_repo
            .find(VisibleImages::new().approved_all().recent(), limit, offset)
            .await
    }

    /// The blended front page, shuffled with the thread-local RNG.
    pub async fn blend(&self) -> AppResult<Vec<image::Model>> {
        let (popular, recent, staff_picks) = self.blend_sources().await?;
        Ok(blend_images(
            popular,
            recent,
            staff_picks,
            &mut rand::thread_rng(),
        ))
    }

    /// The blended front page, shuffled with the given RNG.
    pub async fn blend_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> AppResult<Vec<image::Model>> {
        let (popular, recent, staff_picks) = self.blend_sources().await?;
        Ok(blend_images(popular, recent, staff_picks, rng))
    }

    async fn blend_sources(
        &self,
    ) -> AppResult<(Vec<image::Model>, Vec<image::Model>, Vec<image::Model>)> {
        let popular = self.popular(self.config.blend_popular, 0).await?;
        let recent = self.recent(self.config.blend_recent, 0).await?;
        let staff_picks = self.staff_picks(self.config.blend_staff_picks, 0).await?;

        debug!(
            popular = popular.len(),
            recent = recent.len(),
            staff_picks = staff_picks.len(),
            "Loaded blend sources"
        );

        Ok((popular, recent, staff_picks))
    }

    /// One page of `scope`.
    ///
    /// Pages are 1-based; `total_entries` skips the count query when the
    /// caller already knows the total.
    pub async fn search(
        &self,
        scope: VisibleImages,
        page: u64,
        total_entries: Option<u64>,
    ) -> AppResult<Page<image::Model>> {
        self.image_repo
            .paginate(scope, page, self.config.per_page, total_entries)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::image;
    use lentil_common::AppError;
    use rand::{SeedableRng, rngs::StdRng};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn images(ids: &[&str]) -> Vec<image::Model> {
        ids.iter().map(|id| image(id)).collect()
    }

    fn sorted_ids(images: &[image::Model]) -> Vec<String> {
        let mut ids: Vec<String> = images.iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_blend_dedups_across_sources() {
        let mut rng = StdRng::seed_from_u64(7);
        let blended = blend_images(
            images(&["a", "b"]),
            images(&["b", "c"]),
            images(&["c", "d", "a"]),
            &mut rng,
        );

        assert_eq!(sorted_ids(&blended), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_blend_keeps_first_occurrence() {
        let mut popular = image("a");
        popular.popular_score = 99;
        let mut rng = StdRng::seed_from_u64(1);

        let blended = blend_images(vec![popular], images(&["a"]), Vec::new(), &mut rng);

        assert_eq!(blended.len(), 1);
        assert_eq!(blended[0].popular_score, 99);
    }

    #[test]
    fn test_blend_is_deterministic_for_seed() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            blend_images(
                images(&["a", "b", "c"]),
                images(&["d", "e"]),
                images(&["f", "g", "h"]),
                &mut rng,
            )
            .into_iter()
            .map(|m| m.id)
            .collect::<Vec<_>>()
        };

        assert_eq!(run(42), run(42));
        assert_eq!(run(42).len(), 8);
    }

    #[test]
    fn test_blend_empty_sources() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(blend_images(Vec::new(), Vec::new(), Vec::new(), &mut rng).is_empty());
    }

    #[tokio::test]
    async fn test_blend_with_rng() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([images(&["p1", "shared"])])
                .append_query_results([images(&["r1", "shared"])])
                .append_query_results([images(&["s1"])])
                .into_connection(),
        );

        let service = FeedService::new(ImageRepository::new(db), FeedConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let blended = service.blend_with_rng(&mut rng).await.unwrap();

        assert_eq!(sorted_ids(&blended), ["p1", "r1", "s1", "shared"]);
    }

    #[tokio::test]
    async fn test_search_uses_configured_page_size() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([images(&["a", "b"])])
                .into_connection(),
        );

        let config = FeedConfig {
            per_page: 2,
            ..FeedConfig::default()
        };
        let service = FeedService::new(ImageRepository::new(db), config);
        let page = service
            .search(VisibleImages::new().approved(), 2, Some(5))
            .await
            .unwrap();

        assert_eq!(page.per_page, 2);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_search_page_zero() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FeedService::new(ImageRepository::new(db), FeedConfig::default());
        let result = service.search(VisibleImages::new(), 0, None).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
