//! Create battle table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Battle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Battle::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Battle::ImageId).string().not_null())
                    .col(ColumnDef::new(Battle::LoserId).string().not_null())
                    .col(
                        ColumnDef::new(Battle::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_battle_winner")
                            .from(Battle::Table, Battle::ImageId)
                            .to(Image::Table, Image::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_battle_loser")
                            .from(Battle::Table, Battle::LoserId)
                            .to(Image::Table, Image::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_battle_image_id")
                    .table(Battle::Table)
                    .col(Battle::ImageId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_battle_loser_id")
                    .table(Battle::Table)
                    .col(Battle::LoserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Battle::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Battle {
    Table,
    Id,
    ImageId,
    LoserId,
    CreatedAt,
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
}
