//! Grocery list entity - Shopping lists that are checked out into expenses.
//!
//! A list is open while `completed_at` is `None`. Checkout sets `completed_at` and
//! `total_amount` together; afterwards the list's items are read-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Grocery list database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grocery_lists")]
pub struct Model {
    /// Unique identifier for the list
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// List name (e.g., "Weekly Shopping")
    pub name: String,
    /// When the list was created
    pub created_at: DateTimeUtc,
    /// When the list was checked out, if it has been
    pub completed_at: Option<DateTimeUtc>,
    /// Amount actually paid at checkout
    pub total_amount: Option<f64>,
}

impl Model {
    /// Whether the list has been checked out.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Defines relationships between `GroceryList` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One list has many items
    #[sea_orm(has_many = "super::grocery_item::Entity")]
    Items,
}

impl Related<super::grocery_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
