//! Migration to create tickets table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tickets::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Tickets::Code)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tickets::EventName).string_len(200).not_null())
                    .col(ColumnDef::new(Tickets::Venue).string_len(200).null())
                    .col(ColumnDef::new(Tickets::Seat).string_len(32).null())
                    .col(ColumnDef::new(Tickets::CodeFolded).string_len(64).not_null())
                    .col(ColumnDef::new(Tickets::EventNameFolded).string_len(200).not_null())
                    .col(ColumnDef::new(Tickets::VenueFolded).string_len(200).null())
                    .col(ColumnDef::new(Tickets::SeatFolded).string_len(32).null())
                    .col(
                        ColumnDef::new(Tickets::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tickets::Status)
                            .string_len(20)
                            .not_null()
                            .default("available"),
                    )
                    .col(ColumnDef::new(Tickets::CustomerId).string().null())
                    .col(ColumnDef::new(Tickets::CardId).string().null())
                    .col(
                        ColumnDef::new(Tickets::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tickets::ModifiedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_customer")
                            .from(Tickets::Table, Tickets::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_card")
                            .from(Tickets::Table, Tickets::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_tickets_status", Tickets::Status),
            ("idx_tickets_customer_id", Tickets::CustomerId),
            ("idx_tickets_modified_time", Tickets::ModifiedTime),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Tickets::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tickets {
    Table,
    Id,
    Code,
    EventName,
    Venue,
    Seat,
    CodeFolded,
    EventNameFolded,
    VenueFolded,
    SeatFolded,
    Price,
    Status,
    CustomerId,
    CardId,
    CreatedTime,
    ModifiedTime,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
}
