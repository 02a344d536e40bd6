//! lentil-rs schema migration entry point.
//!
//! Connects to the configured database, applies pending migrations and logs
//! the size of the moderation queues.

use std::sync::Arc;

use lentil_common::Config;
use lentil_db::{repositories::ImageRepository, scope::VisibleImages};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lentil=debug".into()),
        )
        .init();

    info!("Starting lentil-rs migrations...");

    let config = Config::load()?;

    let db = Arc::new(lentil_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    lentil_db::migrate(&db).await?;
    info!("Migrations completed");

    let image_repo = ImageRepository::new(db);
    let visible = image_repo.count(VisibleImages::new()).await?;
    let approved = image_repo.count(VisibleImages::new().approved()).await?;
    let pending = image_repo.count(VisibleImages::new().pending()).await?;
    let flagged = image_repo
        .count(VisibleImages::new().flagged_for_second_moderation())
        .await?;

    info!(visible, approved, pending, flagged, "Image record ready");

    Ok(())
}
