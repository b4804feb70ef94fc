use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{dining_tables, orders::OrderStatus, restaurants};
use crate::services::orders::OrderLine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
}

impl From<&restaurants::Model> for RestaurantSummary {
    fn from(restaurant: &restaurants::Model) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name.clone(),
            description: restaurant.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub id: i32,
    pub table_number: i32,
}

impl From<&dining_tables::Model> for TableSummary {
    fn from(table: &dining_tables::Model) -> Self {
        Self {
            id: table.id,
            table_number: table.table_number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineView {
    pub menu_item_id: i32,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

impl From<&OrderLine> for OrderLineView {
    fn from(line: &OrderLine) -> Self {
        Self {
            menu_item_id: line.menu_item.id,
            name: line.menu_item.name.clone(),
            unit_price: line.menu_item.price,
            quantity: line.order_item.quantity,
            line_total: line.line_total(),
        }
    }
}
