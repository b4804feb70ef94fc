use std::collections::BTreeMap;

use serde::Serialize;

/// Largest quantity a cart line holds; order lines store quantities as `i32`
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

/// A diner's pending selections for one table: menu item id -> quantity.
///
/// Quantities are always between 1 and [`MAX_QUANTITY`]; an item reaching 0
/// is removed and increments saturate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<i32, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one of `menu_item_id`, returning the new quantity
    pub fn increment(&mut self, menu_item_id: i32) -> u32 {
        let quantity = self.items.entry(menu_item_id).or_insert(0);
        *quantity = (*quantity + 1).min(MAX_QUANTITY);
        *quantity
    }

    /// Remove one of `menu_item_id`, returning the remaining quantity.
    /// No-op for items not in the cart.
    pub fn decrement(&mut self, menu_item_id: i32) -> u32 {
        match self.items.get_mut(&menu_item_id) {
            Some(quantity) if *quantity > 1 => {
                *quantity -= 1;
                *quantity
            }
            Some(_) => {
                self.items.remove(&menu_item_id);
                0
            }
            None => 0,
        }
    }

    pub fn quantity(&self, menu_item_id: i32) -> u32 {
        self.items.get(&menu_item_id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.values().map(|qty| u64::from(*qty)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
        self.items.iter().map(|(id, qty)| (*id, *qty))
    }
}

impl FromIterator<(i32, u32)> for Cart {
    fn from_iter<I: IntoIterator<Item = (i32, u32)>>(iter: I) -> Self {
        Self {
            items: iter
                .into_iter()
                .filter(|(_, qty)| *qty > 0)
                .map(|(id, qty)| (id, qty.min(MAX_QUANTITY)))
                .collect(),
        }
    }
}
