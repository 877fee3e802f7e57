//! Shared test utilities for Budget Buddy.
//!
//! This module provides common helper functions for setting up test databases, building
//! in-memory models with sensible defaults, and a [`FakeGateway`] that records calls and
//! can be told to fail.
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

use crate::{
    core::{
        aggregation::DateRange,
        budget::{self, NewCategory, NewTransaction},
        grocery::{self, GroceryListUpdate, NewGroceryItem},
    },
    entities::{category, grocery_item, grocery_list, transaction, transaction::TransactionKind},
    errors::{Error, Result},
    gateway::PersistenceGateway,
};
use chrono::{DateTime, Days, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Owner used by all test fixtures.
pub const TEST_USER: &str = "test_user";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Noon UTC, `offset` days after 2026-03-01. Negative offsets go back in time.
pub fn day(offset: i64) -> DateTime<Utc> {
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    if offset >= 0 {
        base.checked_add_days(Days::new(offset.unsigned_abs())).unwrap()
    } else {
        base.checked_sub_days(Days::new(offset.unsigned_abs())).unwrap()
    }
}

/// Builds an unsaved transaction for pure aggregation tests.
pub fn sample_transaction(
    kind: TransactionKind,
    amount: f64,
    category_id: Option<i64>,
    occurred_at: DateTime<Utc>,
) -> transaction::Model {
    transaction::Model {
        id: 0,
        user_id: TEST_USER.to_string(),
        category_id,
        amount,
        kind,
        description: None,
        occurred_at,
        created_at: occurred_at,
    }
}

/// Builds an unsaved category with no limit.
pub fn sample_category(id: i64, name: &str) -> category::Model {
    category::Model {
        id,
        user_id: TEST_USER.to_string(),
        name: name.to_string(),
        color: None,
        icon: None,
        budget_limit: None,
        created_at: day(0),
    }
}

/// Builds an unsaved open grocery list.
pub fn sample_list(id: i64, name: &str) -> grocery_list::Model {
    grocery_list::Model {
        id,
        user_id: TEST_USER.to_string(),
        name: name.to_string(),
        created_at: day(0),
        completed_at: None,
        total_amount: None,
    }
}

/// Item fields for [`grocery::add_item`].
pub fn new_item(name: &str, quantity: i32, estimated_price: Option<f64>) -> NewGroceryItem {
    NewGroceryItem {
        name: name.to_string(),
        quantity,
        estimated_price,
    }
}

/// Creates a category owned by [`TEST_USER`].
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<category::Model> {
    budget::create_category(
        db,
        TEST_USER,
        NewCategory {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates a transaction owned by [`TEST_USER`] that happened now.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    kind: TransactionKind,
    amount: f64,
    category_id: Option<i64>,
) -> Result<transaction::Model> {
    budget::create_transaction(
        db,
        NewTransaction {
            user_id: TEST_USER.to_string(),
            category_id,
            amount,
            kind,
            description: Some("Test transaction".to_string()),
            occurred_at: Utc::now(),
        },
    )
    .await
}

/// Creates an uncategorized transaction owned by [`TEST_USER`] at `occurred_at`.
pub async fn create_dated_transaction(
    db: &DatabaseConnection,
    kind: TransactionKind,
    amount: f64,
    occurred_at: DateTime<Utc>,
) -> Result<transaction::Model> {
    budget::create_transaction(
        db,
        NewTransaction {
            user_id: TEST_USER.to_string(),
            category_id: None,
            amount,
            kind,
            description: None,
            occurred_at,
        },
    )
    .await
}

/// Sets up a database with one open grocery list named "Weekly Shopping".
pub async fn setup_with_list() -> Result<(DatabaseConnection, grocery_list::Model)> {
    let db = setup_test_db().await?;
    let list = grocery::create_list(&db, TEST_USER, "Weekly Shopping").await?;
    Ok((db, list))
}

/// In-memory [`PersistenceGateway`] that records the calls made to it.
#[derive(Default)]
pub struct FakeGateway {
    transactions: Mutex<Vec<transaction::Model>>,
    categories: Vec<category::Model>,
    lists: Mutex<Vec<grocery_list::Model>>,
    items: Vec<grocery_item::Model>,
    calls: Mutex<Vec<&'static str>>,
    fail_list_update: bool,
    fail_transaction_create: bool,
}

impl FakeGateway {
    /// A gateway holding one grocery list.
    pub fn with_list(list: grocery_list::Model) -> Self {
        Self {
            lists: Mutex::new(vec![list]),
            ..Default::default()
        }
    }

    /// Replaces the stored categories.
    pub fn with_categories(mut self, categories: Vec<category::Model>) -> Self {
        self.categories = categories;
        self
    }

    /// Replaces the stored transactions.
    pub fn with_transactions(self, transactions: Vec<transaction::Model>) -> Self {
        *self.transactions.lock().unwrap() = transactions;
        self
    }

    /// Makes every grocery list update fail.
    pub fn failing_list_update(mut self) -> Self {
        self.fail_list_update = true;
        self
    }

    /// Makes every transaction insert fail.
    pub fn failing_transaction_create(mut self) -> Self {
        self.fail_transaction_create = true;
        self
    }

    /// Names of the gateway methods called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Stored transactions.
    pub fn transactions(&self) -> Vec<transaction::Model> {
        self.transactions.lock().unwrap().clone()
    }

    /// Stored list with the given ID.
    pub fn list(&self, list_id: i64) -> Option<grocery_list::Model> {
        self.lists
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == list_id)
            .cloned()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unavailable(operation: &str) -> Error {
    Error::Config {
        message: format!("{operation} unavailable"),
    }
}

impl PersistenceGateway for FakeGateway {
    async fn list_transactions(
        &self,
        owner_id: &str,
        range: DateRange,
    ) -> Result<Vec<transaction::Model>> {
        self.record("list_transactions");
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == owner_id && range.contains(t.occurred_at))
            .cloned()
            .collect())
    }

    async fn list_categories(&self, owner_id: &str) -> Result<Vec<category::Model>> {
        self.record("list_categories");
        Ok(self
            .categories
            .iter()
            .filter(|c| c.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<transaction::Model> {
        self.record("create_transaction");
        if self.fail_transaction_create {
            return Err(unavailable("create_transaction"));
        }

        let mut transactions = self.transactions.lock().unwrap();
        let created = transaction::Model {
            id: i64::try_from(transactions.len()).unwrap() + 1,
            user_id: new_transaction.user_id,
            category_id: new_transaction.category_id,
            amount: new_transaction.amount,
            kind: new_transaction.kind,
            description: new_transaction.description,
            occurred_at: new_transaction.occurred_at,
            created_at: Utc::now(),
        };
        transactions.push(created.clone());
        Ok(created)
    }

    async fn update_grocery_list(
        &self,
        list_id: i64,
        update: GroceryListUpdate,
    ) -> Result<grocery_list::Model> {
        self.record("update_grocery_list");
        if self.fail_list_update {
            return Err(unavailable("update_grocery_list"));
        }

        let mut lists = self.lists.lock().unwrap();
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| Error::not_found("grocery list", list_id))?;
        if let Some(name) = update.name {
            list.name = name;
        }
        if update.completed_at.is_some() {
            list.completed_at = update.completed_at;
        }
        if update.total_amount.is_some() {
            list.total_amount = update.total_amount;
        }
        Ok(list.clone())
    }

    async fn list_grocery_items(&self, list_id: i64) -> Result<Vec<grocery_item::Model>> {
        self.record("list_grocery_items");
        Ok(self
            .items
            .iter()
            .filter(|i| i.list_id == list_id)
            .cloned()
            .collect())
    }
}
