use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuCategories::Table)
                    .if_not_exists()
                    .col(pk_auto(MenuCategories::Id))
                    .col(integer(MenuCategories::RestaurantId))
                    .col(string_len(MenuCategories::Name, 100))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_categories_restaurant_id")
                            .from(MenuCategories::Table, MenuCategories::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(pk_auto(MenuItems::Id))
                    .col(integer(MenuItems::CategoryId))
                    .col(string(MenuItems::Name))
                    .col(text(MenuItems::Description).default(""))
                    .col(decimal_len(MenuItems::Price, 8, 2))
                    .col(boolean(MenuItems::Available).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_items_category_id")
                            .from(MenuItems::Table, MenuItems::CategoryId)
                            .to(MenuCategories::Table, MenuCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_items_category_id")
                    .table(MenuItems::Table)
                    .col(MenuItems::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MenuCategories {
    Table,
    Id,
    RestaurantId,
    Name,
}

#[derive(DeriveIden)]
enum MenuItems {
    Table,
    Id,
    CategoryId,
    Name,
    Description,
    Price,
    Available,
}

#[derive(DeriveIden)]
enum Restaurants {
    Table,
    Id,
}
