//! Merchant accounts and the restaurant each one owns

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Merchants::Table)
                    .if_not_exists()
                    .col(pk_auto(Merchants::Id))
                    .col(string(Merchants::Username).unique_key())
                    .col(string(Merchants::PasswordHash))
                    .col(
                        timestamp_with_time_zone(Merchants::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(pk_auto(Restaurants::Id))
                    // One restaurant per merchant
                    .col(integer(Restaurants::OwnerId).unique_key())
                    .col(string(Restaurants::Name))
                    .col(text(Restaurants::Description).default(""))
                    .col(integer(Restaurants::NumTables).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurants_owner_id")
                            .from(Restaurants::Table, Restaurants::OwnerId)
                            .to(Merchants::Table, Merchants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Merchants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Merchants {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Restaurants {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    NumTables,
}
