//! Transaction entity - Income and expense records.
//!
//! Each transaction has an owner `user_id`, an optional `category_id`, a non-negative
//! `amount`, a [`TransactionKind`], an optional description, and two timestamps:
//! `occurred_at` (when the money moved) and `created_at` (when it was recorded).
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a transaction brings money in or sends it out
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money received (allowance, wages, scholarships)
    #[sea_orm(string_value = "income")]
    Income,
    /// Money spent
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// Category this transaction is filed under, if any
    pub category_id: Option<i64>,
    /// Transaction amount, always non-negative; direction comes from `kind`
    pub amount: f64,
    /// Income or expense
    pub kind: TransactionKind,
    /// Optional human-readable description
    pub description: Option<String>,
    /// When the transaction took place
    pub occurred_at: DateTimeUtc,
    /// When the transaction was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
