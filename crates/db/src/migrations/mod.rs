//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_image_table;
mod m20250101_000003_create_tag_tables;
mod m20250101_000004_create_license_tables;
mod m20250101_000005_create_like_vote_and_flag_tables;
mod m20250101_000006_create_battle_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_image_table::Migration),
            Box::new(m20250101_000003_create_tag_tables::Migration),
            Box::new(m20250101_000004_create_license_tables::Migration),
            Box::new(m20250101_000005_create_like_vote_and_flag_tables::Migration),
            Box::new(m20250101_000006_create_battle_table::Migration),
        ]
    }
}
