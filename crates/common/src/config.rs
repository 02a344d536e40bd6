//! Application configuration.

use serde::Deserialize;
use std::path::Path;

use crate::AppResult;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Feed sizes and pagination.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Feed configuration.
///
/// The blend draws the top `blend_popular` popular images, the top
/// `blend_recent` recent images and the top `blend_staff_picks` staff picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// Images per page for paginated listings.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Popular images taken into the blend.
    #[serde(default = "default_blend_popular")]
    pub blend_popular: u64,
    /// Recent images taken into the blend.
    #[serde(default = "default_blend_recent")]
    pub blend_recent: u64,
    /// Staff picks taken into the blend.
    #[serde(default = "default_blend_staff_picks")]
    pub blend_staff_picks: u64,
}

impl FeedConfig {
    /// Upper bound on the number of images a blend can return.
    #[must_use]
    pub const fn blend_capacity(&self) -> u64 {
        self.blend_popular + self.blend_recent + self.blend_staff_picks
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            blend_popular: default_blend_popular(),
            blend_recent: default_blend_recent(),
            blend_staff_picks: default_blend_staff_picks(),
        }
    }
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_per_page() -> u64 {
    20
}

const fn default_blend_popular() -> u64 {
    50
}

const fn default_blend_recent() -> u64 {
    100
}

const fn default_blend_staff_picks() -> u64 {
    150
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `LENTIL_ENV`)
    /// 3. Environment variables with `LENTIL__` prefix
    pub fn load() -> AppResult<Self> {
        let env = std::env::var("LENTIL_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LENTIL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("LENTIL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
