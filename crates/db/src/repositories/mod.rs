//! Database repositories.

mod battle;
mod flag;
mod image;
mod license;
mod like_vote;
mod tag;
mod user;

pub use battle::BattleRepository;
pub use flag::FlagRepository;
pub use image::{ImageRepository, Page};
pub use license::LicenseRepository;
pub use like_vote::LikeVoteRepository;
pub use tag::TagRepository;
pub use user::UserRepository;

use lentil_common::AppError;
use sea_orm::{DbErr, SqlErr};

const UNIQUE_VIOLATION: &str = "duplicate key value violates unique constraint";

/// Map an insert error, turning unique index violations into `Conflict`.
///
/// Postgres reports the violation through sqlx; errors surfaced as plain
/// text carry the server message instead.
pub(crate) fn write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => AppError::Conflict(msg),
        _ if err.to_string().contains(UNIQUE_VIOLATION) => AppError::Conflict(err.to_string()),
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_write_error_detects_unique_violation() {
        let err = DbErr::Query(RuntimeErr::Internal(format!(
            "{UNIQUE_VIOLATION} \"idx_like_vote_unique\""
        )));
        assert!(matches!(write_error(err), AppError::Conflict(_)));

        let err = DbErr::Custom("connection reset".to_string());
        assert!(matches!(write_error(err), AppError::Database(_)));
    }
}
