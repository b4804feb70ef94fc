use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};

use crate::AppState;
use crate::error::AppError;
use crate::models::common::{OrderLineView, OrderSummary, TableSummary};
use crate::models::merchant::OrderDetailView;
use crate::services::orders;

use super::{CurrentMerchant, DASHBOARD_PATH};

/// GET /merchant/order/{order_id}/
pub async fn order_detail(
    State(state): State<AppState>,
    CurrentMerchant(merchant): CurrentMerchant,
    Path(order_id): Path<i32>,
) -> Result<Json<OrderDetailView>, AppError> {
    let (order, table) = orders::find_order_for_restaurant(&state.db, order_id, merchant.restaurant_id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let lines = orders::order_lines(&state.db, order.id).await?;

    Ok(Json(OrderDetailView {
        order: OrderSummary {
            id: order.id,
            status: order.status,
            created_at: order.created_at,
        },
        table: TableSummary::from(&table),
        items: lines.iter().map(OrderLineView::from).collect(),
        total_price: orders::total_price(&lines),
    }))
}

/// GET /merchant/order/{order_id}/complete/
pub async fn complete_order(
    State(state): State<AppState>,
    CurrentMerchant(merchant): CurrentMerchant,
    Path(order_id): Path<i32>,
) -> Result<Redirect, AppError> {
    let (order, _) = orders::find_order_for_restaurant(&state.db, order_id, merchant.restaurant_id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    orders::complete_order(&state.db, order).await?;

    Ok(Redirect::to(DASHBOARD_PATH))
}
