//! Persistence gateway - The storage capability handed to the checkout and dashboard code.
//!
//! Higher-level flows never reach for a global client. They take a [`PersistenceGateway`]
//! parameter, which production code satisfies with [`SeaOrmGateway`] and tests satisfy
//! with in-memory fakes that can be told to fail.

use crate::{
    core::{
        aggregation::DateRange,
        budget::{self, NewTransaction},
        grocery::{self, GroceryListUpdate},
    },
    entities::{category, grocery_item, grocery_list, transaction},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::future::Future;

/// Storage operations consumed by checkout and reporting.
pub trait PersistenceGateway {
    /// Lists a user's transactions inside `range`, newest first.
    fn list_transactions(
        &self,
        owner_id: &str,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<transaction::Model>>> + Send;

    /// Lists a user's categories.
    fn list_categories(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<category::Model>>> + Send;

    /// Stores a new transaction and returns it with its assigned ID.
    fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> impl Future<Output = Result<transaction::Model>> + Send;

    /// Applies a partial update to a grocery list and returns the updated row.
    ///
    /// An update carrying only `completed_at` and `total_amount` is a checkout and is
    /// accepted even if the list is already completed; any other update of a completed
    /// list fails with [`Error::ListCompleted`](crate::errors::Error::ListCompleted).
    fn update_grocery_list(
        &self,
        list_id: i64,
        update: GroceryListUpdate,
    ) -> impl Future<Output = Result<grocery_list::Model>> + Send;

    /// Lists the items of a grocery list.
    fn list_grocery_items(
        &self,
        list_id: i64,
    ) -> impl Future<Output = Result<Vec<grocery_item::Model>>> + Send;
}

/// [`PersistenceGateway`] backed by a `SeaORM` connection.
#[derive(Debug)]
pub struct SeaOrmGateway {
    db: DatabaseConnection,
}

impl SeaOrmGateway {
    /// Wraps an open database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection, for service calls outside the gateway.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl PersistenceGateway for SeaOrmGateway {
    async fn list_transactions(
        &self,
        owner_id: &str,
        range: DateRange,
    ) -> Result<Vec<transaction::Model>> {
        budget::get_transactions(&self.db, owner_id, range).await
    }

    async fn list_categories(&self, owner_id: &str) -> Result<Vec<category::Model>> {
        budget::get_categories(&self.db, owner_id).await
    }

    async fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<transaction::Model> {
        budget::create_transaction(&self.db, new_transaction).await
    }

    async fn update_grocery_list(
        &self,
        list_id: i64,
        update: GroceryListUpdate,
    ) -> Result<grocery_list::Model> {
        match update {
            GroceryListUpdate {
                name: None,
                completed_at: Some(completed_at),
                total_amount: Some(total_amount),
            } => grocery::complete_list(&self.db, list_id, completed_at, total_amount).await,
            update => grocery::update_list(&self.db, list_id, update).await,
        }
    }

    async fn list_grocery_items(&self, list_id: i64) -> Result<Vec<grocery_item::Model>> {
        grocery::get_items_for_list(&self.db, list_id).await
    }
}
