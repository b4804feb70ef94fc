use axum::{Form, extract::State, response::Redirect};

use crate::AppState;
use crate::error::AppError;
use crate::models::merchant::{CategoryForm, MenuItemForm};
use crate::services::menu::{self, NewMenuItem};

use super::{CurrentMerchant, DASHBOARD_PATH};

/// POST /merchant/add-category/
pub async fn add_category(
    State(state): State<AppState>,
    CurrentMerchant(merchant): CurrentMerchant,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect, AppError> {
    menu::add_category(&state.db, merchant.restaurant_id, &form.category_name).await?;
    Ok(Redirect::to(DASHBOARD_PATH))
}

/// POST /merchant/add-menu-item/
///
/// Invalid input is dropped without feedback.
pub async fn add_menu_item(
    State(state): State<AppState>,
    CurrentMerchant(merchant): CurrentMerchant,
    Form(form): Form<MenuItemForm>,
) -> Result<Redirect, AppError> {
    menu::add_menu_item(
        &state.db,
        merchant.restaurant_id,
        NewMenuItem {
            name: &form.item_name,
            description: &form.item_description,
            price: &form.item_price,
            category_id: &form.category_id,
        },
    )
    .await?;

    Ok(Redirect::to(DASHBOARD_PATH))
}
