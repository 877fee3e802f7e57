//! Budget category entity - User-defined labels that bucket expenses.
//!
//! Categories are not strict parents: deleting one leaves its transactions in place with
//! no category, and reports show them as uncategorized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// Display name (e.g., "Food", "Transport")
    pub name: String,
    /// Optional hex color used by charts
    pub color: Option<String>,
    /// Optional icon name
    pub icon: Option<String>,
    /// Optional spending limit for the budgeting period
    pub budget_limit: Option<f64>,
    /// When the category was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category labels many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
