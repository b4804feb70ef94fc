//! Restaurants and their dining tables

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{dining_tables, order_items, orders, prelude::*, restaurants};

/// Rows per INSERT, well under the bind-parameter limits of SQLite and Postgres
const INSERT_CHUNK: usize = 500;

/// Outcome of reconciling a restaurant's table count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCountChange {
    pub created: Vec<i32>,
    pub deleted: Vec<i32>,
}

pub async fn find_restaurant<C>(db: &C, restaurant_id: i32) -> Result<Option<restaurants::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    Restaurants::find_by_id(restaurant_id).one(db).await
}

/// Look up a table together with the restaurant it belongs to
pub async fn find_table<C>(
    db: &C,
    table_id: i32,
) -> Result<Option<(dining_tables::Model, restaurants::Model)>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    let found = DiningTables::find_by_id(table_id)
        .find_also_related(Restaurants)
        .one(db)
        .await?;

    Ok(found.and_then(|(table, restaurant)| restaurant.map(|r| (table, r))))
}

pub async fn list_tables<C>(db: &C, restaurant_id: i32) -> Result<Vec<dining_tables::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    DiningTables::find()
        .filter(dining_tables::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(dining_tables::Column::TableNumber)
        .order_by_asc(dining_tables::Column::Id)
        .all(db)
        .await
}

/// Store the menu URL encoded in a table's QR code if none is recorded yet
pub async fn record_qr_code_url<C>(
    db: &C,
    table: dining_tables::Model,
    url: &str,
) -> Result<dining_tables::Model, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    if !table.qr_code_url.is_empty() {
        return Ok(table);
    }

    let mut active_model = table.into_active_model();
    active_model.qr_code_url = Set(url.to_string());
    active_model.update(db).await
}

/// Grow or shrink a restaurant to `table_count` tables.
///
/// New tables are numbered sequentially above the current highest number.
/// Tables numbered above `table_count` are deleted along with their orders.
pub async fn set_table_count<C>(
    db: &C,
    restaurant: restaurants::Model,
    table_count: u32,
) -> Result<TableCountChange, sea_orm::DbErr>
where
    C: TransactionTrait,
{
    let target = i32::try_from(table_count)
        .map_err(|_| sea_orm::DbErr::Custom(format!("table count {table_count} out of range")))?;
    let restaurant_id = restaurant.id;

    let txn = db.begin().await?;

    let current_max: Option<i32> = DiningTables::find()
        .select_only()
        .column_as(dining_tables::Column::TableNumber.max(), "max_number")
        .filter(dining_tables::Column::RestaurantId.eq(restaurant_id))
        .into_tuple::<Option<i32>>()
        .one(&txn)
        .await?
        .flatten();
    let current_max = current_max.unwrap_or(0);

    let mut change = TableCountChange::default();

    if target > current_max {
        let numbers: Vec<i32> = (current_max + 1..=target).collect();
        for chunk in numbers.chunks(INSERT_CHUNK) {
            let new_tables = chunk.iter().map(|&number| dining_tables::ActiveModel {
                restaurant_id: Set(restaurant_id),
                table_number: Set(number),
                qr_code_url: Set(String::new()),
                ..Default::default()
            });
            DiningTables::insert_many(new_tables).exec(&txn).await?;
        }
        change.created = numbers;
    } else if target < current_max {
        let doomed = || {
            DiningTables::find()
                .filter(dining_tables::Column::RestaurantId.eq(restaurant_id))
                .filter(dining_tables::Column::TableNumber.gt(target))
        };
        change.deleted = doomed()
            .select_only()
            .column(dining_tables::Column::TableNumber)
            .order_by_asc(dining_tables::Column::TableNumber)
            .into_tuple::<i32>()
            .all(&txn)
            .await?;

        // Cascade explicitly so backends without FK enforcement agree
        let doomed_table_ids = doomed()
            .select_only()
            .column(dining_tables::Column::Id)
            .into_query();
        let doomed_order_ids = Orders::find()
            .select_only()
            .column(orders::Column::Id)
            .filter(orders::Column::TableId.in_subquery(doomed_table_ids.clone()))
            .into_query();

        OrderItems::delete_many()
            .filter(order_items::Column::OrderId.in_subquery(doomed_order_ids))
            .exec(&txn)
            .await?;
        Orders::delete_many()
            .filter(orders::Column::TableId.in_subquery(doomed_table_ids))
            .exec(&txn)
            .await?;
        DiningTables::delete_many()
            .filter(dining_tables::Column::RestaurantId.eq(restaurant_id))
            .filter(dining_tables::Column::TableNumber.gt(target))
            .exec(&txn)
            .await?;
    }

    let mut active_model = restaurant.into_active_model();
    active_model.num_tables = Set(target);
    active_model.update(&txn).await?;

    txn.commit().await?;

    info!(
        restaurant_id,
        table_count = target,
        created = change.created.len(),
        deleted = change.deleted.len(),
        "Reconciled table count"
    );

    Ok(change)
}
