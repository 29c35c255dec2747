//! Migration: partners, the catalog and partner category grants.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Partners::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Partners::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Partners::PartnerType).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Partners::VerificationStatus)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Partners::CommissionRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Partners::AllowInternational)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Partners::AllowGroup)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Partners::AllowPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Partners::BusinessName).string().not_null())
                    .col(ColumnDef::new(Partners::ContactPerson).string().not_null())
                    .col(ColumnDef::new(Partners::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Partners::Profile).json_binary().not_null())
                    .col(
                        ColumnDef::new(Partners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Partners::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partners_user")
                            .from(Partners::Table, Partners::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Categories::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Categories::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Categories::Kind).string_len(32).not_null())
                    .col(ColumnDef::new(Categories::Description).text().null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubCategories::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(SubCategories::Name).string().not_null())
                    .col(ColumnDef::new(SubCategories::Description).text().null())
                    .col(ColumnDef::new(SubCategories::RequiredFields).json_binary().null())
                    .col(
                        ColumnDef::new(SubCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sub_categories_category")
                            .from(SubCategories::Table, SubCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TourTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TourTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TourTypes::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(TourTypes::Description).text().null())
                    .col(
                        ColumnDef::new(TourTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TourThemes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TourThemes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TourThemes::Theme).string().not_null().unique_key())
                    .col(ColumnDef::new(TourThemes::Description).text().null())
                    .col(
                        ColumnDef::new(TourThemes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CategoryPermissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CategoryPermissions::PartnerId).uuid().not_null())
                    .col(ColumnDef::new(CategoryPermissions::CategoryId).uuid().not_null())
                    .col(
                        ColumnDef::new(CategoryPermissions::SubCategoryIds)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CategoryPermissions::TourTypeIds)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CategoryPermissions::TourThemeIds)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CategoryPermissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CategoryPermissions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_permissions_partner")
                            .from(CategoryPermissions::Table, CategoryPermissions::PartnerId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_permissions_category")
                            .from(CategoryPermissions::Table, CategoryPermissions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_category_permissions_partner_category")
                    .table(CategoryPermissions::Table)
                    .col(CategoryPermissions::PartnerId)
                    .col(CategoryPermissions::CategoryId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CategoryPermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourThemes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Partners::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Partners {
    Table,
    Id,
    UserId,
    PartnerType,
    VerificationStatus,
    CommissionRate,
    AllowInternational,
    AllowGroup,
    AllowPrivate,
    BusinessName,
    ContactPerson,
    PhoneNumber,
    Profile,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Categories {
    Table,
    Id,
    Name,
    Kind,
    Description,
    CreatedAt,
}

#[derive(Iden)]
pub(super) enum SubCategories {
    Table,
    Id,
    CategoryId,
    Name,
    Description,
    RequiredFields,
    CreatedAt,
}

#[derive(Iden)]
enum TourTypes {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum TourThemes {
    Table,
    Id,
    Theme,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum CategoryPermissions {
    Table,
    Id,
    PartnerId,
    CategoryId,
    SubCategoryIds,
    TourTypeIds,
    TourThemeIds,
    CreatedAt,
    UpdatedAt,
}
