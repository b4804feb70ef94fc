use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{OrderLineView, OrderSummary, RestaurantSummary, TableSummary};
use crate::session::Cart;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeView {
    pub title: String,
    pub merchant_login_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackView {
    pub message: String,
}

/// Customer menu for one table, annotated with the visitor's cart
#[derive(Debug, Clone, Serialize)]
pub struct MenuView {
    pub table: TableSummary,
    pub restaurant: RestaurantSummary,
    pub categories: Vec<MenuCategoryView>,
    pub cart: Cart,
    pub cart_item_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategoryView {
    pub id: i32,
    pub name: String,
    pub items: Vec<MenuItemView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    /// Quantity of this item in the visitor's cart
    pub in_cart: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub table: TableSummary,
    /// The order shown, absent when the cart was empty
    pub order: Option<OrderSummary>,
    pub items: Vec<OrderLineView>,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessView {
    pub table_id: Option<i32>,
}
