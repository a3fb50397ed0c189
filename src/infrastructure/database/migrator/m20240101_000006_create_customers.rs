//! Migration to create customers table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::FullName).string_len(200).not_null())
                    .col(ColumnDef::new(Customers::Phone).string_len(32).null())
                    .col(ColumnDef::new(Customers::Email).string_len(255).null())
                    .col(ColumnDef::new(Customers::Address).string_len(500).null())
                    .col(ColumnDef::new(Customers::FullNameFolded).string_len(200).not_null())
                    .col(ColumnDef::new(Customers::PhoneFolded).string_len(32).null())
                    .col(ColumnDef::new(Customers::EmailFolded).string_len(255).null())
                    .col(ColumnDef::new(Customers::AddressFolded).string_len(500).null())
                    .col(
                        ColumnDef::new(Customers::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::ModifiedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_full_name")
                    .table(Customers::Table)
                    .col(Customers::FullName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    FullName,
    Phone,
    Email,
    Address,
    FullNameFolded,
    PhoneFolded,
    EmailFolded,
    AddressFolded,
    CreatedTime,
    ModifiedTime,
}
