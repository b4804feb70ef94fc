//! Diner-facing handlers: menu, cart and checkout
//!
//! Cart mutations only touch the session; the database is written at checkout.

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::AppState;
use crate::error::AppError;
use crate::models::common::{OrderLineView, OrderSummary, RestaurantSummary, TableSummary};
use crate::models::customer::{CartView, MenuCategoryView, MenuItemView, MenuView};
use crate::services::checkout::{CheckoutOutcome, checkout};
use crate::services::{menu, orders, restaurant};
use crate::session::Session;

use super::menu_path;

/// GET /table/{table_id}/menu/
pub async fn table_menu(
    State(state): State<AppState>,
    session: Session,
    Path(table_id): Path<i32>,
) -> Result<Json<MenuView>, AppError> {
    let (table, restaurant) = restaurant::find_table(&state.db, table_id)
        .await?
        .ok_or(AppError::NotFound("Table"))?;

    let cart = session.cart(table_id);
    let categories = menu::menu_for_restaurant(&state.db, restaurant.id)
        .await?
        .into_iter()
        .map(|(category, items)| MenuCategoryView {
            id: category.id,
            name: category.name,
            items: items
                .into_iter()
                .map(|item| MenuItemView {
                    in_cart: cart.quantity(item.id),
                    id: item.id,
                    name: item.name,
                    description: item.description,
                    price: item.price,
                    available: item.available,
                })
                .collect(),
        })
        .collect();

    Ok(Json(MenuView {
        table: TableSummary::from(&table),
        restaurant: RestaurantSummary::from(&restaurant),
        categories,
        cart_item_count: cart.total_quantity(),
        cart,
    }))
}

async fn ensure_table_and_item(state: &AppState, table_id: i32, item_id: i32) -> Result<(), AppError> {
    restaurant::find_table(&state.db, table_id)
        .await?
        .ok_or(AppError::NotFound("Table"))?;
    menu::find_menu_item(&state.db, item_id)
        .await?
        .ok_or(AppError::NotFound("Menu item"))?;
    Ok(())
}

/// GET /table/{table_id}/order/{item_id}/
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path((table_id, item_id)): Path<(i32, i32)>,
) -> Result<Redirect, AppError> {
    ensure_table_and_item(&state, table_id, item_id).await?;

    let quantity = session.update_cart(table_id, |cart| cart.increment(item_id));
    debug!(table_id, item_id, quantity, "Cart item added");

    Ok(Redirect::to(&menu_path(table_id)))
}

/// GET /table/{table_id}/decrease/{item_id}/
pub async fn decrease_item(
    State(state): State<AppState>,
    session: Session,
    Path((table_id, item_id)): Path<(i32, i32)>,
) -> Result<Redirect, AppError> {
    ensure_table_and_item(&state, table_id, item_id).await?;

    if session.cart(table_id).quantity(item_id) > 0 {
        let quantity = session.update_cart(table_id, |cart| cart.decrement(item_id));
        debug!(table_id, item_id, quantity, "Cart item removed");
    }

    Ok(Redirect::to(&menu_path(table_id)))
}

/// GET /table/{table_id}/cart/
///
/// Shows the table's order. A non-empty cart becomes a new order unless the
/// table already has a pending one, in which case that order is shown.
pub async fn view_cart(
    State(state): State<AppState>,
    session: Session,
    Path(table_id): Path<i32>,
) -> Result<Json<CartView>, AppError> {
    let (table, _) = restaurant::find_table(&state.db, table_id)
        .await?
        .ok_or(AppError::NotFound("Table"))?;
    session.set_last_table_id(table_id);

    let cart = session.cart(table_id);
    let outcome = checkout(&state.db, table_id, &cart).await?;

    if let CheckoutOutcome::Created(order) = &outcome {
        session.clear_cart(table_id);
        info!(table_id, order_id = order.id, "Cart submitted");
    }

    let Some(order) = outcome.order() else {
        return Ok(Json(CartView {
            table: TableSummary::from(&table),
            order: None,
            items: Vec::new(),
            total_price: Decimal::ZERO,
        }));
    };

    let lines = orders::order_lines(&state.db, order.id).await?;

    Ok(Json(CartView {
        table: TableSummary::from(&table),
        order: Some(OrderSummary {
            id: order.id,
            status: order.status,
            created_at: order.created_at,
        }),
        items: lines.iter().map(OrderLineView::from).collect(),
        total_price: orders::total_price(&lines),
    }))
}
