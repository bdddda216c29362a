//! Migration: Create dmat_accounts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DmatAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DmatAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DmatAccounts::AccountNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DmatAccounts::HolderName).string().not_null())
                    .col(
                        ColumnDef::new(DmatAccounts::ExpiryDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DmatAccounts::RenewalStatus)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(
                        ColumnDef::new(DmatAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DmatAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DmatAccounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DmatAccounts {
    Table,
    Id,
    AccountNumber,
    HolderName,
    ExpiryDate,
    RenewalStatus,
    CreatedAt,
    UpdatedAt,
}
