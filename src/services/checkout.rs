//! Turning a session cart into a persisted order

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait, TryInsertResult,
    sea_query::OnConflict,
};
use tracing::{debug, info};

use crate::entities::{
    menu_items, order_items,
    orders::{self, OrderStatus},
    prelude::*,
};
use crate::error::AppError;
use crate::services::orders::find_pending_order;
use crate::session::Cart;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing in the cart; no order exists or was created
    EmptyCart,
    /// A new order was created from the cart, which should now be cleared
    Created(orders::Model),
    /// The table already had a pending order; the cart was not used
    Existing(orders::Model),
}

impl CheckoutOutcome {
    pub fn order(&self) -> Option<&orders::Model> {
        match self {
            CheckoutOutcome::EmptyCart => None,
            CheckoutOutcome::Created(order) | CheckoutOutcome::Existing(order) => Some(order),
        }
    }
}

/// Materialize `cart` as an order for `table_id`.
///
/// At most one pending order exists per table: the order insert is
/// conditional on the `pending_table_id` unique key, so concurrent checkouts
/// for the same table converge on a single order.
pub async fn checkout<C>(db: &C, table_id: i32, cart: &Cart) -> Result<CheckoutOutcome, AppError>
where
    C: TransactionTrait,
{
    if cart.is_empty() {
        return Ok(CheckoutOutcome::EmptyCart);
    }

    let txn = db.begin().await?;

    if let Some(existing) = find_pending_order(&txn, table_id).await? {
        debug!(table_id, order_id = existing.id, "Reusing pending order");
        txn.commit().await?;
        return Ok(CheckoutOutcome::Existing(existing));
    }

    let outcome = place_order(&txn, table_id, cart).await?;
    txn.commit().await?;

    if let CheckoutOutcome::Created(order) = &outcome {
        info!(
            table_id,
            order_id = order.id,
            lines = cart.len(),
            items = cart.total_quantity(),
            "Order created from cart"
        );
    }

    Ok(outcome)
}

/// Insert the order and its lines unless another pending order for the table
/// wins the `pending_table_id` unique key, in which case that order is returned.
async fn place_order<C>(db: &C, table_id: i32, cart: &Cart) -> Result<CheckoutOutcome, AppError>
where
    C: ConnectionTrait,
{
    let item_ids: Vec<i32> = cart.iter().map(|(id, _)| id).collect();
    let found = MenuItems::find()
        .filter(menu_items::Column::Id.is_in(item_ids))
        .all(db)
        .await?;
    if found.len() != cart.len() {
        return Err(AppError::NotFound("Menu item"));
    }

    let lines = cart
        .iter()
        .map(|(menu_item_id, quantity)| {
            let quantity =
                i32::try_from(quantity).map_err(|_| AppError::BadRequest("Quantity out of range"))?;
            Ok((menu_item_id, quantity))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let new_order = orders::ActiveModel {
        table_id: Set(table_id),
        created_at: Set(Utc::now()),
        status: Set(OrderStatus::Pending),
        pending_table_id: Set(Some(table_id)),
        ..Default::default()
    };
    let inserted = Orders::insert(new_order)
        .on_conflict(
            OnConflict::column(orders::Column::PendingTableId)
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec(db)
        .await?;

    let order_id = match inserted {
        TryInsertResult::Inserted(result) => result.last_insert_id,
        TryInsertResult::Conflicted | TryInsertResult::Empty => {
            // Lost a race with a concurrent checkout for this table
            let existing = find_pending_order(db, table_id)
                .await?
                .ok_or(AppError::NotFound("Pending order"))?;
            debug!(table_id, order_id = existing.id, "Pending order created concurrently");
            return Ok(CheckoutOutcome::Existing(existing));
        }
    };

    let lines = lines.into_iter().map(|(menu_item_id, quantity)| order_items::ActiveModel {
        order_id: Set(order_id),
        menu_item_id: Set(menu_item_id),
        quantity: Set(quantity),
        ..Default::default()
    });
    OrderItems::insert_many(lines).exec(db).await?;

    let order = Orders::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    Ok(CheckoutOutcome::Created(order))
}
