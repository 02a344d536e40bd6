//! Database entities.

#![allow(missing_docs)]

pub mod admin_user;
pub mod battle;
pub mod flag;
pub mod image;
pub mod license;
pub mod licensing;
pub mod like_vote;
pub mod tag;
pub mod tagging;
pub mod user;

pub use admin_user::Entity as AdminUser;
pub use battle::Entity as Battle;
pub use flag::Entity as Flag;
pub use image::Entity as Image;
pub use license::Entity as License;
pub use licensing::Entity as Licensing;
pub use like_vote::Entity as LikeVote;
pub use tag::Entity as Tag;
pub use tagging::Entity as Tagging;
pub use user::Entity as User;
