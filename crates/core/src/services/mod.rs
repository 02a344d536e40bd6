//! Business logic services.

#![allow(missing_docs)]

pub mod feed;
pub mod image;
pub mod moderation;
pub mod tags;
pub mod voting;

pub use feed::FeedService;
pub use image::{CreateImageInput, ImageResponse, ImageService};
pub use moderation::{ModerateInput, ModerationEvent, ModerationService};
pub use voting::VotingService;
