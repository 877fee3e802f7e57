//! Budget business logic - Categories and transactions.
//!
//! This module provides functions for creating, retrieving, updating, and deleting budget
//! categories and income/expense transactions. Amounts are validated before any write:
//! they must be finite and non-negative, with the direction carried by
//! [`TransactionKind`]. Deleting a category never deletes transactions; they are detached
//! and show up as uncategorized in reports.

use crate::{
    config::settings::CategoryConfig,
    core::aggregation::DateRange,
    entities::{Category, Transaction, category, transaction, transaction::TransactionKind},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info};

/// Fields for a new category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    /// Category name, must not be blank
    pub name: String,
    /// Optional chart color
    pub color: Option<String>,
    /// Optional icon name
    pub icon: Option<String>,
    /// Optional spending limit
    pub budget_limit: Option<f64>,
}

/// Partial update for a category. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    /// New name
    pub name: Option<String>,
    /// New color
    pub color: Option<String>,
    /// New icon
    pub icon: Option<String>,
    /// New limit; `Some(None)` removes the limit
    pub budget_limit: Option<Option<f64>>,
}

/// Fields for a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Owning user ID
    pub user_id: String,
    /// Category to file the transaction under
    pub category_id: Option<i64>,
    /// Non-negative amount
    pub amount: f64,
    /// Income or expense
    pub kind: TransactionKind,
    /// Optional description
    pub description: Option<String>,
    /// When the money moved
    pub occurred_at: DateTime<Utc>,
}

/// Partial update for a transaction. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    /// New category; `Some(None)` detaches the transaction
    pub category_id: Option<Option<i64>>,
    /// New amount
    pub amount: Option<f64>,
    /// New kind
    pub kind: Option<TransactionKind>,
    /// New description; `Some(None)` clears it
    pub description: Option<Option<String>>,
    /// New date
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Rejects amounts that are negative or not finite.
pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Trims `name` and rejects it when blank.
pub(crate) fn validate_name(name: &str, what: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{what} name cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_limit(limit: Option<f64>) -> Result<()> {
    limit.map_or(Ok(()), validate_amount)
}

/// Retrieves a user's categories ordered alphabetically by name.
pub async fn get_categories(db: &DatabaseConnection, user_id: &str) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a category by its ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category for `user_id`.
///
/// # Errors
/// Returns an error if the name is blank, the limit is negative or not finite, or the
/// insert fails.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: &str,
    new_category: NewCategory,
) -> Result<category::Model> {
    let name = validate_name(&new_category.name, "Category")?;
    validate_limit(new_category.budget_limit)?;

    let model = category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name),
        color: Set(new_category.color),
        icon: Set(new_category.icon),
        budget_limit: Set(new_category.budget_limit),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!("Created category {} ({})", created.name, created.id);
    Ok(created)
}

/// Applies a partial update to a category.
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    update: CategoryUpdate,
) -> Result<category::Model> {
    let existing = get_category_by_id(db, category_id)
        .await?
        .ok_or_else(|| Error::not_found("category", category_id))?;

    let mut active_model: category::ActiveModel = existing.into();
    if let Some(name) = update.name {
        active_model.name = Set(validate_name(&name, "Category")?);
    }
    if let Some(color) = update.color {
        active_model.color = Set(Some(color));
    }
    if let Some(icon) = update.icon {
        active_model.icon = Set(Some(icon));
    }
    if let Some(limit) = update.budget_limit {
        validate_limit(limit)?;
        active_model.budget_limit = Set(limit);
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Deletes a category and detaches its transactions.
///
/// Both steps run in one database transaction. Detached transactions keep their amounts
/// and are reported as uncategorized.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let category = Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("category", category_id))?;

    let detached = Transaction::update_many()
        .col_expr(
            transaction::Column::CategoryId,
            Expr::value(Option::<i64>::None),
        )
        .filter(transaction::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?;

    category.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted category {category_id}, detached {} transaction(s)",
        detached.rows_affected
    );
    Ok(())
}

/// Creates any configured default categories the user does not have yet.
///
/// Categories are matched by exact name, so calling this on every start-up is harmless.
/// Returns the number of categories created.
pub async fn seed_default_categories(
    db: &DatabaseConnection,
    user_id: &str,
    defaults: &[CategoryConfig],
) -> Result<usize> {
    let existing = get_categories(db, user_id).await?;
    let mut created = 0;

    for config in defaults {
        if existing.iter().any(|c| c.name == config.name.trim()) {
            continue;
        }
        create_category(
            db,
            user_id,
            NewCategory {
                name: config.name.clone(),
                color: config.color.clone(),
                icon: config.icon.clone(),
                budget_limit: config.budget_limit,
            },
        )
        .await?;
        created += 1;
    }

    if created > 0 {
        info!("Seeded {created} default categories for user {user_id}");
    }
    Ok(created)
}

/// Retrieves a user's transactions inside `range`, newest first.
pub async fn get_transactions(
    db: &DatabaseConnection,
    user_id: &str,
    range: DateRange,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find().filter(transaction::Column::UserId.eq(user_id));
    if let Some(start) = range.start {
        query = query.filter(transaction::Column::OccurredAt.gte(start));
    }
    if let Some(end) = range.end {
        query = query.filter(transaction::Column::OccurredAt.lte(end));
    }

    query
        .order_by_desc(transaction::Column::OccurredAt)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a transaction by its ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records a new transaction.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for negative or non-finite amounts, or a database
/// error if the insert fails.
pub async fn create_transaction(
    db: &DatabaseConnection,
    new_transaction: NewTransaction,
) -> Result<transaction::Model> {
    validate_amount(new_transaction.amount)?;

    let model = transaction::ActiveModel {
        user_id: Set(new_transaction.user_id),
        category_id: Set(new_transaction.category_id),
        amount: Set(new_transaction.amount),
        kind: Set(new_transaction.kind),
        description: Set(new_transaction.description),
        occurred_at: Set(new_transaction.occurred_at),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(
        "Recorded {:?} of {:.2} for user {}",
        created.kind, created.amount, created.user_id
    );
    Ok(created)
}

/// Applies a partial update to a transaction.
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    update: TransactionUpdate,
) -> Result<transaction::Model> {
    let existing = get_transaction_by_id(db, transaction_id)
        .await?
        .ok_or_else(|| Error::not_found("transaction", transaction_id))?;

    let mut active_model: transaction::ActiveModel = existing.into();
    if let Some(amount) = update.amount {
        validate_amount(amount)?;
        active_model.amount = Set(amount);
    }
    if let Some(category_id) = update.category_id {
        active_model.category_id = Set(category_id);
    }
    if let Some(kind) = update.kind {
        active_model.kind = Set(kind);
    }
    if let Some(description) = update.description {
        active_model.description = Set(description);
    }
    if let Some(occurred_at) = update.occurred_at {
        active_model.occurred_at = Set(occurred_at);
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Deletes a transaction.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let result = Transaction::delete_by_id(transaction_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("transaction", transaction_id));
    }
    Ok(())
}
