//! Migration: listings and listing modification requests.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_partner_tables::{Categories, Partners, SubCategories};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Listings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Listings::PartnerId).uuid().not_null())
                    .col(ColumnDef::new(Listings::Title).string().not_null())
                    .col(ColumnDef::new(Listings::Description).text().not_null())
                    .col(ColumnDef::new(Listings::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Listings::SubCategoryId).uuid().null())
                    .col(ColumnDef::new(Listings::CustomerType).string_len(16).null())
                    .col(ColumnDef::new(Listings::TourKind).string_len(16).null())
                    .col(ColumnDef::new(Listings::BasePrice).big_integer().not_null())
                    .col(
                        ColumnDef::new(Listings::Currency)
                            .string_len(3)
                            .not_null()
                            .default("PKR"),
                    )
                    .col(ColumnDef::new(Listings::Location).string().null())
                    .col(ColumnDef::new(Listings::Capacity).integer().null())
                    .col(ColumnDef::new(Listings::Images).json_binary().not_null())
                    .col(
                        ColumnDef::new(Listings::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Listings::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_partner")
                            .from(Listings::Table, Listings::PartnerId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_category")
                            .from(Listings::Table, Listings::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_sub_category")
                            .from(Listings::Table, Listings::SubCategoryId)
                            .to(SubCategories::Table, SubCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_status")
                    .table(Listings::Table)
                    .col(Listings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListingModificationRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingModificationRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ListingModificationRequests::ListingId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingModificationRequests::PartnerId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingModificationRequests::Patch)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingModificationRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(ListingModificationRequests::AdminNotes).text().null())
                    .col(
                        ColumnDef::new(ListingModificationRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingModificationRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_modification_requests_listing")
                            .from(
                                ListingModificationRequests::Table,
                                ListingModificationRequests::ListingId,
                            )
                            .to(Listings::Table, Listings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ListingModificationRequests::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Listings {
    Table,
    Id,
    PartnerId,
    Title,
    Description,
    CategoryId,
    SubCategoryId,
    CustomerType,
    TourKind,
    BasePrice,
    Currency,
    Location,
    Capacity,
    Images,
    Status,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ListingModificationRequests {
    Table,
    Id,
    ListingId,
    PartnerId,
    Patch,
    Status,
    AdminNotes,
    CreatedAt,
    UpdatedAt,
}
