//! Migration: Create client_profiles table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClientProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClientProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClientProfiles::UserId).uuid().null())
                    .col(
                        ColumnDef::new(ClientProfiles::ShareholderName)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClientProfiles::PanNumber).string().not_null())
                    .col(ColumnDef::new(ClientProfiles::AadhaarNumber).string().null())
                    .col(ColumnDef::new(ClientProfiles::Address).text().null())
                    .col(ColumnDef::new(ClientProfiles::BankDetails).json_binary().null())
                    .col(ColumnDef::new(ClientProfiles::DematAccountNumber).string().null())
                    .col(ColumnDef::new(ClientProfiles::DematCreatedWith).string().null())
                    .col(
                        ColumnDef::new(ClientProfiles::DematCreatedWithPerson)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClientProfiles::DematCreatedWithPersonNumber)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClientProfiles::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(ClientProfiles::Remarks).text().null())
                    .col(ColumnDef::new(ClientProfiles::Dividend).json_binary().null())
                    .col(
                        ColumnDef::new(ClientProfiles::CurrentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClientProfiles::Companies)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(ClientProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClientProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_client_profiles_pan_number")
                    .table(ClientProfiles::Table)
                    .col(ClientProfiles::PanNumber)
                    .to_owned(),
            )
            .await?;

        // Listings are newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_client_profiles_created_at")
                    .table(ClientProfiles::Table)
                    .col(ClientProfiles::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClientProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClientProfiles {
    Table,
    Id,
    UserId,
    ShareholderName,
    PanNumber,
    AadhaarNumber,
    Address,
    BankDetails,
    DematAccountNumber,
    DematCreatedWith,
    DematCreatedWithPerson,
    DematCreatedWithPersonNumber,
    Status,
    Remarks,
    Dividend,
    CurrentDate,
    Companies,
    CreatedAt,
    UpdatedAt,
}
