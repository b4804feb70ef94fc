//! `SeaORM` Entity for restaurants

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning merchant, one restaurant per merchant
    #[sea_orm(unique)]
    pub owner_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Table count as last set from the dashboard
    pub num_tables: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::merchants::Entity",
        from = "Column::OwnerId",
        to = "super::merchants::Column::Id",
        on_delete = "Cascade"
    )]
    Merchant,
    #[sea_orm(has_many = "super::dining_tables::Entity")]
    DiningTable,
    #[sea_orm(has_many = "super::menu_categories::Entity")]
    MenuCategory,
}

impl Related<super::merchants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Merchant.def()
    }
}

impl Related<super::dining_tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiningTable.def()
    }
}

impl Related<super::menu_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
