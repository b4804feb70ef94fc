//! Order queries, totals and completion

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::{
    dining_tables, menu_items, order_items,
    orders::{self, OrderStatus},
    prelude::*,
};

/// One order line joined with the menu item it refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub order_item: order_items::Model,
    pub menu_item: menu_items::Model,
}

impl OrderLine {
    /// Current price times quantity
    pub fn line_total(&self) -> Decimal {
        self.menu_item.price * Decimal::from(self.order_item.quantity)
    }
}

/// Sum of line totals at current menu prices
pub fn total_price(lines: &[OrderLine]) -> Decimal {
    lines.iter().map(OrderLine::line_total).sum()
}

pub async fn find_pending_order<C>(db: &C, table_id: i32) -> Result<Option<orders::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    Orders::find()
        .filter(orders::Column::TableId.eq(table_id))
        .filter(orders::Column::Status.eq(OrderStatus::Pending))
        .order_by_asc(orders::Column::Id)
        .one(db)
        .await
}

pub async fn order_lines<C>(db: &C, order_id: i32) -> Result<Vec<OrderLine>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    let rows = OrderItems::find()
        .filter(order_items::Column::OrderId.eq(order_id))
        .order_by_asc(order_items::Column::Id)
        .find_also_related(MenuItems)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(order_item, menu_item)| {
            menu_item.map(|menu_item| OrderLine { order_item, menu_item })
        })
        .collect())
}

/// Pending orders across a restaurant's tables, newest first
pub async fn pending_orders_for_restaurant<C>(
    db: &C,
    restaurant_id: i32,
) -> Result<Vec<(orders::Model, dining_tables::Model)>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    let rows = Orders::find()
        .find_also_related(DiningTables)
        .filter(orders::Column::Status.eq(OrderStatus::Pending))
        .filter(dining_tables::Column::RestaurantId.eq(restaurant_id))
        .order_by_desc(orders::Column::CreatedAt)
        .order_by_desc(orders::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(order, table)| table.map(|table| (order, table)))
        .collect())
}

/// An order, provided it was placed at one of the restaurant's tables
pub async fn find_order_for_restaurant<C>(
    db: &C,
    order_id: i32,
    restaurant_id: i32,
) -> Result<Option<(orders::Model, dining_tables::Model)>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    let row = Orders::find_by_id(order_id)
        .find_also_related(DiningTables)
        .filter(dining_tables::Column::RestaurantId.eq(restaurant_id))
        .one(db)
        .await?;

    Ok(row.and_then(|(order, table)| table.map(|table| (order, table))))
}

/// Mark an order COMPLETED. Completing an already completed order changes nothing.
pub async fn complete_order<C>(db: &C, order: orders::Model) -> Result<orders::Model, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    if order.status == OrderStatus::Completed && order.pending_table_id.is_none() {
        return Ok(order);
    }

    let order_id = order.id;
    let mut active_model = order.into_active_model();
    active_model.status = Set(OrderStatus::Completed);
    active_model.pending_table_id = Set(None);
    let order = active_model.update(db).await?;

    info!(order_id, "Order completed");
    Ok(order)
}
