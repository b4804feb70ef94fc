//! Merchant login, logout and dashboard

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

use crate::AppState;
use crate::error::AppError;
use crate::models::common::TableSummary;
use crate::models::merchant::{
    CategorySummary, DashboardRestaurant, DashboardTable, DashboardView, LoginForm, LoginView,
    PendingOrderView, TableCountForm,
};
use crate::services::{auth, menu, orders, restaurant};
use crate::session::Session;

use super::{CurrentMerchant, DASHBOARD_PATH};

pub const MISSING_CREDENTIALS: &str = "Please enter both username and password.";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// GET /merchant/login/
pub async fn login_page() -> Json<LoginView> {
    Json(LoginView::default())
}

/// POST /merchant/login/
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();
    let password = form.password.trim();

    if username.is_empty() || password.is_empty() {
        return Ok(login_error(StatusCode::BAD_REQUEST, MISSING_CREDENTIALS));
    }

    match auth::authenticate(&state.db, username, password).await? {
        Ok(identity) => {
            info!(
                merchant_id = identity.merchant_id,
                restaurant_id = identity.restaurant_id,
                "Merchant logged in"
            );
            session.log_in(identity);
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(reason) => {
            warn!(username, ?reason, "Merchant login refused");
            Ok(login_error(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS))
        }
    }
}

fn login_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(LoginView {
            error_message: Some(message.to_string()),
        }),
    )
        .into_response()
}

/// GET /merchant/logout/
pub async fn logout(session: Session) -> Redirect {
    if let Some(merchant) = session.merchant() {
        info!(merchant_id = merchant.merchant_id, "Merchant logged out");
    }
    session.flush();
    Redirect::to("/")
}

/// GET /merchant/dashboard/
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentMerchant(merchant): CurrentMerchant,
) -> Result<Json<DashboardView>, AppError> {
    let restaurant = restaurant::find_restaurant(&state.db, merchant.restaurant_id)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;

    let tables = restaurant::list_tables(&state.db, restaurant.id)
        .await?
        .into_iter()
        .map(|table| DashboardTable {
            qr_code_path: format!("/qr/{}/", table.id),
            id: table.id,
            table_number: table.table_number,
        })
        .collect();

    let pending = orders::pending_orders_for_restaurant(&state.db, restaurant.id)
        .await?
        .into_iter()
        .map(|(order, table)| PendingOrderView {
            id: order.id,
            table: TableSummary::from(&table),
            created_at: order.created_at,
        })
        .collect();

    let categories = menu::list_categories(&state.db, restaurant.id)
        .await?
        .into_iter()
        .map(|category| CategorySummary {
            id: category.id,
            name: category.name,
        })
        .collect();

    Ok(Json(DashboardView {
        username: merchant.username,
        restaurant: DashboardRestaurant {
            id: restaurant.id,
            name: restaurant.name,
            description: restaurant.description,
            num_tables: restaurant.num_tables,
        },
        tables,
        orders: pending,
        categories,
    }))
}

/// Positive table counts only; anything else is ignored
fn parse_table_count(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|count| *count > 0 && i32::try_from(*count).is_ok())
}

/// POST /merchant/dashboard/
pub async fn update_table_count(
    State(state): State<AppState>,
    CurrentMerchant(merchant): CurrentMerchant,
    Form(form): Form<TableCountForm>,
) -> Result<Redirect, AppError> {
    let Some(table_count) = parse_table_count(&form.table_count) else {
        warn!(value = %form.table_count, "Ignoring invalid table count");
        return Ok(Redirect::to(DASHBOARD_PATH));
    };

    if let Some(restaurant) = restaurant::find_restaurant(&state.db, merchant.restaurant_id).await? {
        restaurant::set_table_count(&state.db, restaurant, table_count).await?;
    }

    Ok(Redirect::to(DASHBOARD_PATH))
}
