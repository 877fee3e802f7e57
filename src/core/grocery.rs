//! Grocery list business logic - Lists, items, and purchase tracking.
//!
//! Lists stay editable until they are checked out (see [`crate::core::checkout`]). Once a
//! list has a `completed_at` timestamp it is read-only: renaming it, or adding, editing,
//! toggling, or deleting its items, fails with [`Error::ListCompleted`]. Only
//! [`complete_list`] writes to a completed list.

use crate::{
    core::budget::{validate_amount, validate_name},
    entities::{GroceryItem, GroceryList, grocery_item, grocery_list},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// A grocery list together with its items.
#[derive(Debug, Clone, PartialEq)]
pub struct GroceryListWithItems {
    /// The list
    pub list: grocery_list::Model,
    /// Its items, oldest first
    pub items: Vec<grocery_item::Model>,
}

/// Partial update for a grocery list. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct GroceryListUpdate {
    /// New name
    pub name: Option<String>,
    /// Checkout time
    pub completed_at: Option<DateTime<Utc>>,
    /// Amount paid at checkout
    pub total_amount: Option<f64>,
}

/// Fields for a new grocery item.
#[derive(Debug, Clone)]
pub struct NewGroceryItem {
    /// Item name, must not be blank
    pub name: String,
    /// How many to buy, at least 1
    pub quantity: i32,
    /// Expected price for the line
    pub estimated_price: Option<f64>,
}

/// Partial update for a grocery item. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct GroceryItemUpdate {
    /// New name
    pub name: Option<String>,
    /// New quantity
    pub quantity: Option<i32>,
    /// New estimate; `Some(None)` clears it
    pub estimated_price: Option<Option<f64>>,
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(Error::Validation {
            message: format!("Quantity must be at least 1, got {quantity}"),
        });
    }
    Ok(())
}

/// Loads a list and fails unless it is still open for edits.
async fn open_list<C>(db: &C, list_id: i64) -> Result<grocery_list::Model>
where
    C: ConnectionTrait,
{
    let list = GroceryList::find_by_id(list_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("grocery list", list_id))?;

    if list.is_completed() {
        return Err(Error::ListCompleted { list_id });
    }
    Ok(list)
}

/// Loads an item whose list is still open.
async fn editable_item(db: &DatabaseConnection, item_id: i64) -> Result<grocery_item::Model> {
    let item = GroceryItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("grocery item", item_id))?;
    open_list(db, item.list_id).await?;
    Ok(item)
}

/// Retrieves a user's grocery lists, newest first.
pub async fn get_lists(db: &DatabaseConnection, user_id: &str) -> Result<Vec<grocery_list::Model>> {
    GroceryList::find()
        .filter(grocery_list::Column::UserId.eq(user_id))
        .order_by_desc(grocery_list::Column::CreatedAt)
        .order_by_desc(grocery_list::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a grocery list by its ID.
pub async fn get_list(db: &DatabaseConnection, list_id: i64) -> Result<Option<grocery_list::Model>> {
    GroceryList::find_by_id(list_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the items of a list in the order they were added.
pub async fn get_items_for_list(
    db: &DatabaseConnection,
    list_id: i64,
) -> Result<Vec<grocery_item::Model>> {
    GroceryItem::find()
        .filter(grocery_item::Column::ListId.eq(list_id))
        .order_by_asc(grocery_item::Column::CreatedAt)
        .order_by_asc(grocery_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a list and its items, or `None` if the list does not exist.
pub async fn get_list_with_items(
    db: &DatabaseConnection,
    list_id: i64,
) -> Result<Option<GroceryListWithItems>> {
    let Some(list) = get_list(db, list_id).await? else {
        return Ok(None);
    };
    let items = get_items_for_list(db, list_id).await?;
    Ok(Some(GroceryListWithItems { list, items }))
}

/// Creates an empty, open grocery list.
pub async fn create_list(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
) -> Result<grocery_list::Model> {
    let model = grocery_list::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(validate_name(name, "Grocery list")?),
        created_at: Set(Utc::now()),
        completed_at: Set(None),
        total_amount: Set(None),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!("Created grocery list {} ({})", created.name, created.id);
    Ok(created)
}

/// Applies a partial update to an open list.
///
/// # Errors
/// Returns [`Error::ListCompleted`] once the list has been checked out.
pub async fn update_list(
    db: &DatabaseConnection,
    list_id: i64,
    update: GroceryListUpdate,
) -> Result<grocery_list::Model> {
    let existing = open_list(db, list_id).await?;

    let mut active_model: grocery_list::ActiveModel = existing.into();
    if let Some(name) = update.name {
        active_model.name = Set(validate_name(&name, "Grocery list")?);
    }
    if let Some(total_amount) = update.total_amount {
        validate_amount(total_amount)?;
        active_model.total_amount = Set(Some(total_amount));
    }
    if let Some(completed_at) = update.completed_at {
        active_model.completed_at = Set(Some(completed_at));
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Records a checkout on a list: when it happened and what was paid.
///
/// Prior completion is not checked, so completing a list again overwrites both fields.
pub async fn complete_list(
    db: &DatabaseConnection,
    list_id: i64,
    completed_at: DateTime<Utc>,
    total_amount: f64,
) -> Result<grocery_list::Model> {
    validate_amount(total_amount)?;
    let existing = get_list(db, list_id)
        .await?
        .ok_or_else(|| Error::not_found("grocery list", list_id))?;

    let mut active_model: grocery_list::ActiveModel = existing.into();
    active_model.completed_at = Set(Some(completed_at));
    active_model.total_amount = Set(Some(total_amount));

    let completed = active_model.update(db).await?;
    debug!("Completed grocery list {list_id} for {total_amount:.2}");
    Ok(completed)
}

/// Deletes a list and all of its items.
pub async fn delete_list(db: &DatabaseConnection, list_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let list = GroceryList::find_by_id(list_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("grocery list", list_id))?;

    let items = GroceryItem::delete_many()
        .filter(grocery_item::Column::ListId.eq(list_id))
        .exec(&txn)
        .await?;
    list.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted grocery list {list_id} with {} item(s)",
        items.rows_affected
    );
    Ok(())
}

/// Adds an item to an open list.
///
/// # Errors
/// Returns [`Error::ListCompleted`] if the list was checked out, [`Error::Validation`] for
/// a blank name or a quantity below 1, and [`Error::InvalidAmount`] for a bad estimate.
pub async fn add_item(
    db: &DatabaseConnection,
    list_id: i64,
    new_item: NewGroceryItem,
) -> Result<grocery_item::Model> {
    let name = validate_name(&new_item.name, "Grocery item")?;
    validate_quantity(new_item.quantity)?;
    if let Some(price) = new_item.estimated_price {
        validate_amount(price)?;
    }
    open_list(db, list_id).await?;

    let model = grocery_item::ActiveModel {
        list_id: Set(list_id),
        name: Set(name),
        quantity: Set(new_item.quantity),
        estimated_price: Set(new_item.estimated_price),
        is_purchased: Set(false),
        created_at: Set(Utc::now()),
        purchased_at: Set(None),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Applies a partial update to an item of an open list.
pub async fn update_item(
    db: &DatabaseConnection,
    item_id: i64,
    update: GroceryItemUpdate,
) -> Result<grocery_item::Model> {
    let item = editable_item(db, item_id).await?;

    let mut active_model: grocery_item::ActiveModel = item.into();
    if let Some(name) = update.name {
        active_model.name = Set(validate_name(&name, "Grocery item")?);
    }
    if let Some(quantity) = update.quantity {
        validate_quantity(quantity)?;
        active_model.quantity = Set(quantity);
    }
    if let Some(price) = update.estimated_price {
        if let Some(price) = price {
            validate_amount(price)?;
        }
        active_model.estimated_price = Set(price);
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Flips an item's purchased flag, stamping or clearing `purchased_at`.
pub async fn toggle_item_purchased(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<grocery_item::Model> {
    let item = editable_item(db, item_id).await?;
    let purchased = !item.is_purchased;

    let mut active_model: grocery_item::ActiveModel = item.into();
    active_model.is_purchased = Set(purchased);
    active_model.purchased_at = Set(purchased.then(Utc::now));

    active_model.update(db).await.map_err(Into::into)
}

/// Removes an item from an open list.
pub async fn delete_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let item = editable_item(db, item_id).await?;
    item.delete(db).await?;
    Ok(())
}

/// Sum of the items' estimated prices; items without an estimate count as 0.
#[must_use]
pub fn estimated_total(items: &[grocery_item::Model]) -> f64 {
    items.iter().filter_map(|item| item.estimated_price).sum()
}

/// Percentage of items already purchased; 0 for an empty list.
#[must_use]
pub fn purchase_progress(items: &[grocery_item::Model]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }

    let purchased = items.iter().filter(|item| item.is_purchased).count();
    // Cast safety: item counts are far below 2^52
    #[allow(clippy::cast_precision_loss)]
    let progress = purchased as f64 / items.len() as f64 * 100.0;
    progress
}
