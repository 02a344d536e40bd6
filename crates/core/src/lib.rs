//! Core business logic for lentil-rs.
//!
//! Services over the repositories in `lentil-db`: image creation and tags,
//! moderation, feeds and voting.

pub mod services;

pub use services::*;
