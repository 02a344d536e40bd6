//! Common utilities and shared types for lentil-rs.
//!
//! This crate holds everything that does not need a database:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers via [`IdGenerator`]
//! - **Emoji tokens**: Reversible emoji tokenization for text columns
//! - **Metadata codec**: Stored form of image metadata
//! - **Media URLs**: Size-variant and secure media URLs

pub mod config;
pub mod emoji;
pub mod error;
pub mod id;
pub mod media_url;
pub mod metadata;

pub use config::{Config, FeedConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use media_url::MediaSize;
pub use metadata::CodecError;
