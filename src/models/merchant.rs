use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{OrderLineView, OrderSummary, TableSummary};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginView {
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableCountForm {
    #[serde(default)]
    pub table_count: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub category_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemForm {
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub item_price: String,
    #[serde(default)]
    pub item_description: String,
    #[serde(default)]
    pub category_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub username: String,
    pub restaurant: DashboardRestaurant,
    pub tables: Vec<DashboardTable>,
    pub orders: Vec<PendingOrderView>,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRestaurant {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub num_tables: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardTable {
    pub id: i32,
    pub table_number: i32,
    /// Path of the table's QR code image
    pub qr_code_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrderView {
    pub id: i32,
    pub table: TableSummary,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailView {
    pub order: OrderSummary,
    pub table: TableSummary,
    pub items: Vec<OrderLineView>,
    pub total_price: Decimal,
}
