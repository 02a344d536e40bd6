//! Create like_vote and flag tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LikeVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LikeVote::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LikeVote::ImageId).string().not_null())
                    .col(ColumnDef::new(LikeVote::UserId).string().not_null())
                    .col(
                        ColumnDef::new(LikeVote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_vote_image")
                            .from(LikeVote::Table, LikeVote::ImageId)
                            .to(Image::Table, Image::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One vote per user per image
        manager
            .create_index(
                Index::create()
                    .name("idx_like_vote_unique")
                    .table(LikeVote::Table)
                    .col(LikeVote::ImageId)
                    .col(LikeVote::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Flag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Flag::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Flag::ImageId).string().not_null())
                    .col(ColumnDef::new(Flag::UserId).string().null())
                    .col(
                        ColumnDef::new(Flag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flag_image")
                            .from(Flag::Table, Flag::ImageId)
                            .to(Image::Table, Image::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_flag_image_id")
                    .table(Flag::Table)
                    .col(Flag::ImageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Flag::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LikeVote::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum LikeVote {
    Table,
    Id,
    ImageId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Flag {
    Table,
    Id,
    ImageId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
}
