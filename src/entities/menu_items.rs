//! `SeaORM` Entity for menu items

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Current price; order totals are computed from this, not snapshotted
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub price: Decimal,
    pub available: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::menu_categories::Entity",
        from = "Column::CategoryId",
        to = "super::menu_categories::Column::Id",
        on_delete = "Cascade"
    )]
    MenuCategory,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItem,
}

impl Related<super::menu_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuCategory.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
