use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiningTables::Table)
                    .if_not_exists()
                    .col(pk_auto(DiningTables::Id))
                    .col(integer(DiningTables::RestaurantId))
                    .col(integer(DiningTables::TableNumber))
                    .col(string(DiningTables::QrCodeUrl).default(""))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dining_tables_restaurant_id")
                            .from(DiningTables::Table, DiningTables::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: numbering is maintained by the dashboard, not the schema
        manager
            .create_index(
                Index::create()
                    .name("idx_dining_tables_restaurant_number")
                    .table(DiningTables::Table)
                    .col(DiningTables::RestaurantId)
                    .col(DiningTables::TableNumber)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiningTables::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DiningTables {
    Table,
    Id,
    RestaurantId,
    TableNumber,
    QrCodeUrl,
}

#[derive(DeriveIden)]
enum Restaurants {
    Table,
    Id,
}
