//! Migration to create cards table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cards::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Cards::CardNumber)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cards::CardType).string_len(50).not_null())
                    .col(ColumnDef::new(Cards::CardNumberFolded).string_len(64).not_null())
                    .col(ColumnDef::new(Cards::CardTypeFolded).string_len(50).not_null())
                    .col(ColumnDef::new(Cards::CustomerId).string().not_null())
                    .col(
                        ColumnDef::new(Cards::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Cards::ExpiresTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Cards::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cards::ModifiedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cards_customer")
                            .from(Cards::Table, Cards::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cards_customer_id")
                    .table(Cards::Table)
                    .col(Cards::CustomerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
    CardNumber,
    CardType,
    CardNumberFolded,
    CardTypeFolded,
    CustomerId,
    IsActive,
    ExpiresTime,
    CreatedTime,
    ModifiedTime,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
}
