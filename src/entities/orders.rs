//! `SeaORM` Entity for orders

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order lifecycle. Only PENDING -> COMPLETED is ever performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub table_id: i32,
    pub created_at: DateTimeUtc,
    pub status: OrderStatus,
    /// Equal to `table_id` while PENDING, NULL otherwise (unique)
    #[sea_orm(unique)]
    pub pending_table_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dining_tables::Entity",
        from = "Column::TableId",
        to = "super::dining_tables::Column::Id",
        on_delete = "Cascade"
    )]
    DiningTable,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItem,
}

impl Related<super::dining_tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiningTable.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
