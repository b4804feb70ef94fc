//! Menu categories and items

use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info};

use crate::entities::{menu_categories, menu_items, prelude::*};

/// Largest price a decimal(8, 2) column holds
const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Raw fields of the add-menu-item form
#[derive(Debug, Clone, Default)]
pub struct NewMenuItem<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: &'a str,
    pub category_id: &'a str,
}

/// Parse a form price: non-negative, rounded to cents, fits decimal(8, 2)
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?
        .round_dp(2);

    (price >= Decimal::ZERO && price <= MAX_PRICE).then_some(price.normalize())
}

/// Categories of a restaurant with their items, in creation order
pub async fn menu_for_restaurant<C>(
    db: &C,
    restaurant_id: i32,
) -> Result<Vec<(menu_categories::Model, Vec<menu_items::Model>)>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    MenuCategories::find()
        .filter(menu_categories::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(menu_categories::Column::Id)
        .find_with_related(MenuItems)
        .order_by_asc(menu_items::Column::Id)
        .all(db)
        .await
}

pub async fn list_categories<C>(db: &C, restaurant_id: i32) -> Result<Vec<menu_categories::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    MenuCategories::find()
        .filter(menu_categories::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(menu_categories::Column::Id)
        .all(db)
        .await
}

pub async fn find_menu_item<C>(db: &C, menu_item_id: i32) -> Result<Option<menu_items::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    MenuItems::find_by_id(menu_item_id).one(db).await
}

/// Create a category; blank names are ignored
pub async fn add_category<C>(
    db: &C,
    restaurant_id: i32,
    name: &str,
) -> Result<Option<menu_categories::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        debug!(restaurant_id, "Ignoring blank category name");
        return Ok(None);
    }

    let category = menu_categories::ActiveModel {
        restaurant_id: Set(restaurant_id),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(restaurant_id, category_id = category.id, name, "Added menu category");
    Ok(Some(category))
}

/// Create an available menu item in one of the restaurant's own categories.
///
/// Missing fields, a malformed or negative price, a malformed category id and
/// categories owned by another restaurant all yield `Ok(None)`.
pub async fn add_menu_item<C>(
    db: &C,
    restaurant_id: i32,
    form: NewMenuItem<'_>,
) -> Result<Option<menu_items::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    let name = form.name.trim();
    if name.is_empty() || form.price.trim().is_empty() || form.category_id.trim().is_empty() {
        debug!(restaurant_id, "Ignoring incomplete menu item form");
        return Ok(None);
    }

    let Some(price) = parse_price(form.price) else {
        debug!(restaurant_id, price = form.price, "Ignoring invalid price");
        return Ok(None);
    };
    let Ok(category_id) = form.category_id.trim().parse::<i32>() else {
        debug!(restaurant_id, category_id = form.category_id, "Ignoring invalid category id");
        return Ok(None);
    };

    let category = MenuCategories::find_by_id(category_id)
        .filter(menu_categories::Column::RestaurantId.eq(restaurant_id))
        .one(db)
        .await?;
    let Some(category) = category else {
        debug!(restaurant_id, category_id, "Category not owned by restaurant");
        return Ok(None);
    };

    let item = menu_items::ActiveModel {
        category_id: Set(category.id),
        name: Set(name.to_string()),
        description: Set(form.description.trim().to_string()),
        price: Set(price),
        available: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        restaurant_id,
        category_id,
        menu_item_id = item.id,
        %price,
        "Added menu item"
    );
    Ok(Some(item))
}
