//! Create tag and tagging tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tag::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Tag::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Tag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tagging::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tagging::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tagging::ImageId).string().not_null())
                    .col(ColumnDef::new(Tagging::TagId).string().not_null())
                    .col(
                        ColumnDef::new(Tagging::StaffTag)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Tagging::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tagging_image")
                            .from(Tagging::Table, Tagging::ImageId)
                            .to(Image::Table, Image::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tagging_tag")
                            .from(Tagging::Table, Tagging::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tagging_image_id")
                    .table(Tagging::Table)
                    .col(Tagging::ImageId)
                    .to_owned(),
            )
            .await?;

        // A tag is applied once per image, either by staff or by the service
        manager
            .create_index(
                Index::create()
                    .name("idx_tagging_unique")
                    .table(Tagging::Table)
                    .col(Tagging::ImageId)
                    .col(Tagging::TagId)
                    .col(Tagging::StaffTag)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tagging::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Tagging {
    Table,
    Id,
    ImageId,
    TagId,
    StaffTag,
    CreatedAt,
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
}
