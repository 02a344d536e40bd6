//! Create license and licensing tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(License::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(License::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(License::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(License::ShortName)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(License::Url).string_len(512).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Licensing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Licensing::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Licensing::ImageId).string().not_null())
                    .col(ColumnDef::new(Licensing::LicenseId).string().not_null())
                    .col(
                        ColumnDef::new(Licensing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_licensing_image")
                            .from(Licensing::Table, Licensing::ImageId)
                            .to(Image::Table, Image::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_licensing_license")
                            .from(Licensing::Table, Licensing::LicenseId)
                            .to(License::Table, License::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_licensing_unique")
                    .table(Licensing::Table)
                    .col(Licensing::ImageId)
                    .col(Licensing::LicenseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Licensing::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(License::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum License {
    Table,
    Id,
    Title,
    ShortName,
    Url,
}

#[derive(Iden)]
enum Licensing {
    Table,
    Id,
    ImageId,
    LicenseId,
    CreatedAt,
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
}
