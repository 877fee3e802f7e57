//! Grocery item entity - Lines on a grocery list.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Grocery item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grocery_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// List this item belongs to
    pub list_id: i64,
    /// Item name
    pub name: String,
    /// How many to buy
    pub quantity: i32,
    /// Expected price, if the user entered one
    pub estimated_price: Option<f64>,
    /// Whether the item is already in the basket
    pub is_purchased: bool,
    /// When the item was added
    pub created_at: DateTimeUtc,
    /// When the item was marked purchased
    pub purchased_at: Option<DateTimeUtc>,
}

/// Defines relationships between `GroceryItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one list and goes away with it
    #[sea_orm(
        belongs_to = "super::grocery_list::Entity",
        from = "Column::ListId",
        to = "super::grocery_list::Column::Id",
        on_delete = "Cascade"
    )]
    List,
}

impl Related<super::grocery_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::List.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
