//! Create image table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Image::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Image::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Image::UserId).string().not_null())
                    .col(ColumnDef::new(Image::Description).text().null())
                    .col(ColumnDef::new(Image::Url).string_len(255).not_null())
                    .col(ColumnDef::new(Image::LongUrl).string_len(255).null())
                    .col(
                        ColumnDef::new(Image::ExternalIdentifier)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Image::VideoUrl).string_len(255).null())
                    .col(
                        ColumnDef::new(Image::OriginalDatetime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Image::OriginalMetadata).text().null())
                    .col(
                        ColumnDef::new(Image::State)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Image::ModeratorId).string().null())
                    .col(
                        ColumnDef::new(Image::ModeratedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Image::SecondModeration)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Image::StaffLike)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Image::Suppressed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Image::DoNotRequestDonation)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Image::LikeVotesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Image::WinsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Image::LossesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Image::WinPct).double().null())
                    .col(
                        ColumnDef::new(Image::PopularScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Image::FileHarvestedDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Image::FileHarvestFailed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Image::DonorAgreementSubmittedDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Image::DonorAgreementFailed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Image::DonorAgreementRejected)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Image::FailedFileChecks)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Image::FileLastChecked)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Image::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Image::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_image_user")
                            .from(Image::Table, Image::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_image_moderator")
                            .from(Image::Table, Image::ModeratorId)
                            .to(AdminUser::Table, AdminUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // One source identifier per user
        manager
            .create_index(
                Index::create()
                    .name("idx_image_external_identifier_user")
                    .table(Image::Table)
                    .col(Image::ExternalIdentifier)
                    .col(Image::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_image_user_id")
                    .table(Image::Table)
                    .col(Image::UserId)
                    .to_owned(),
            )
            .await?;

        // Feed orderings
        manager
            .create_index(
                Index::create()
                    .name("idx_image_original_datetime")
                    .table(Image::Table)
                    .col(Image::OriginalDatetime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_image_popular")
                    .table(Image::Table)
                    .col(Image::PopularScore)
                    .col(Image::LikeVotesCount)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_image_state")
                    .table(Image::Table)
                    .col(Image::State)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Image::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
    UserId,
    Description,
    Url,
    LongUrl,
    ExternalIdentifier,
    VideoUrl,
    OriginalDatetime,
    OriginalMetadata,
    State,
    ModeratorId,
    ModeratedAt,
    SecondModeration,
    StaffLike,
    Suppressed,
    DoNotRequestDonation,
    LikeVotesCount,
    WinsCount,
    LossesCount,
    WinPct,
    PopularScore,
    FileHarvestedDate,
    FileHarvestFailed,
    DonorAgreementSubmittedDate,
    DonorAgreementFailed,
    DonorAgreementRejected,
    FailedFileChecks,
    FileLastChecked,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum AdminUser {
    Table,
    Id,
}
