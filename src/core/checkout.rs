//! Grocery checkout - Turns a finished shopping trip into a budget expense.
//!
//! A checkout filed under a category first checks that the category belongs to the owner.
//! It then performs two writes through the [`PersistenceGateway`], always in this order:
//!
//! 1. mark the list completed with the amount actually paid;
//! 2. record an expense transaction for that amount.
//!
//! If the first write fails nothing is recorded and the caller gets
//! [`Error::UpstreamWriteFailure`]. If the second write fails the list stays completed and
//! the caller gets [`Error::PartialCompletion`], so it can retry just the transaction. No
//! retries or rollbacks happen here, and a list that is already completed is not
//! rejected: two checkouts of one list record two expenses.

use crate::{
    core::{budget::NewTransaction, grocery, grocery::GroceryListUpdate},
    entities::{grocery_item, grocery_list, transaction, transaction::TransactionKind},
    errors::{CheckoutStep, Error, Result},
    gateway::PersistenceGateway,
};
use chrono::Utc;
use tracing::{error, info};

/// Prefix of the description given to checkout expenses.
pub const GROCERY_DESCRIPTION_PREFIX: &str = "Grocery shopping - ";

/// Everything needed to check out one grocery list.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// User the expense is recorded for
    pub owner_id: String,
    /// List being checked out
    pub list_id: i64,
    /// List name, used in the expense description
    pub list_name: String,
    /// Amount actually paid; must be finite and positive
    pub amount: f64,
    /// Category to file the expense under
    pub category_id: Option<i64>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// The list, now completed
    pub list: grocery_list::Model,
    /// The recorded expense
    pub transaction: transaction::Model,
}

/// What the list is expected to cost, shown before the user enters the paid amount.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPreview {
    /// The list's items
    pub items: Vec<grocery_item::Model>,
    /// Sum of estimated prices
    pub estimated_total: f64,
    /// Percentage of items marked purchased
    pub progress_percent: f64,
}

/// Description recorded on the expense for a checked-out list.
#[must_use]
pub fn checkout_description(list_name: &str) -> String {
    format!("{GROCERY_DESCRIPTION_PREFIX}{list_name}")
}

/// Loads a list's items and summarises what checkout is expected to cost.
pub async fn checkout_preview<G>(gateway: &G, list_id: i64) -> Result<CheckoutPreview>
where
    G: PersistenceGateway,
{
    let items = gateway.list_grocery_items(list_id).await?;
    Ok(CheckoutPreview {
        estimated_total: grocery::estimated_total(&items),
        progress_percent: grocery::purchase_progress(&items),
        items,
    })
}

/// Completes a grocery list and records the matching expense.
///
/// # Errors
/// - [`Error::InvalidAmount`] if the amount is not finite and positive; nothing is written.
/// - [`Error::NotFound`] if `category_id` is not one of the owner's categories; nothing is
///   written.
/// - [`Error::UpstreamWriteFailure`] if the list could not be marked completed; no
///   transaction is attempted.
/// - [`Error::PartialCompletion`] if the list was completed but the expense write failed.
pub async fn complete_checkout<G>(gateway: &G, request: CheckoutRequest) -> Result<CheckoutReceipt>
where
    G: PersistenceGateway,
{
    let CheckoutRequest {
        owner_id,
        list_id,
        list_name,
        amount,
        category_id,
    } = request;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    if let Some(category_id) = category_id {
        let categories = gateway.list_categories(&owner_id).await?;
        if !categories.iter().any(|c| c.id == category_id) {
            return Err(Error::not_found("category", category_id));
        }
    }

    let now = Utc::now();

    let list = gateway
        .update_grocery_list(
            list_id,
            GroceryListUpdate {
                completed_at: Some(now),
                total_amount: Some(amount),
                ..Default::default()
            },
        )
        .await
        .inspect_err(|e| error!("Checkout of list {list_id} failed to complete the list: {e}"))
        .map_err(|source| Error::UpstreamWriteFailure {
            step: CheckoutStep::CompleteList,
            source: Box::new(source),
        })?;

    let transaction = gateway
        .create_transaction(NewTransaction {
            user_id: owner_id,
            category_id,
            amount,
            kind: TransactionKind::Expense,
            description: Some(checkout_description(&list_name)),
            occurred_at: now,
        })
        .await
        .inspect_err(|e| {
            error!("List {list_id} is completed but its expense was not recorded: {e}");
        })
        .map_err(|source| Error::PartialCompletion {
            list_id,
            source: Box::new(source),
        })?;

    info!(
        "Checked out grocery list {list_id} for {amount:.2} as transaction {}",
        transaction.id
    );
    Ok(CheckoutReceipt { list, transaction })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{aggregation::DateRange, budget, grocery::NewGroceryItem},
        gateway::SeaOrmGateway,
        test_utils::*,
    };

    fn request(list_id: i64, amount: f64) -> CheckoutRequest {
        CheckoutRequest {
            owner_id: TEST_USER.to_string(),
            list_id,
            list_name: "Weekly Shopping".to_string(),
            amount,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn test_checkout_records_list_and_expense() -> Result<()> {
        let gateway = FakeGateway::with_list(sample_list(1, "Weekly Shopping"));

        let receipt = complete_checkout(&gateway, request(1, 42.50)).await?;

        assert!(receipt.list.completed_at.is_some());
        assert_eq!(receipt.list.total_amount, Some(42.50));
        assert_eq!(receipt.transaction.amount, 42.50);
        assert_eq!(receipt.transaction.kind, TransactionKind::Expense);
        assert_eq!(
            receipt.transaction.description.as_deref(),
            Some("Grocery shopping - Weekly Shopping")
        );
        assert_eq!(Some(receipt.transaction.occurred_at), receipt.list.completed_at);
        assert_eq!(gateway.transactions().len(), 1);
        assert_eq!(gateway.calls(), vec!["update_grocery_list", "create_transaction"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_rejects_invalid_amounts_without_writes() {
        let gateway = FakeGateway::with_list(sample_list(1, "Weekly Shopping"));

        for amount in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let result = complete_checkout(&gateway, request(1, amount)).await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        assert!(gateway.calls().is_empty());
        assert!(gateway.list(1).unwrap().completed_at.is_none());
    }

    #[tokio::test]
    async fn test_checkout_checks_category_owner() -> Result<()> {
        let mut foreign = sample_category(2, "Rent");
        foreign.user_id = "someone_else".to_string();
        let gateway = FakeGateway::with_list(sample_list(1, "Weekly Shopping"))
            .with_categories(vec![sample_category(1, "Food"), foreign]);

        let rejected = complete_checkout(
            &gateway,
            CheckoutRequest {
                category_id: Some(2),
                ..request(1, 12.0)
            },
        )
        .await;
        assert!(matches!(rejected, Err(Error::NotFound { entity: "category", .. })));
        assert_eq!(gateway.calls(), vec!["list_categories"]);
        assert!(gateway.list(1).unwrap().completed_at.is_none());
        assert!(gateway.transactions().is_empty());

        let receipt = complete_checkout(
            &gateway,
            CheckoutRequest {
                category_id: Some(1),
                ..request(1, 12.0)
            },
        )
        .await?;
        assert_eq!(receipt.transaction.category_id, Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_update_failure_skips_transaction() {
        let gateway = FakeGateway::with_list(sample_list(1, "Weekly Shopping")).failing_list_update();

        let result = complete_checkout(&gateway, request(1, 10.0)).await;

        assert!(matches!(
            result,
            Err(Error::UpstreamWriteFailure {
                step: CheckoutStep::CompleteList,
                ..
            })
        ));
        assert_eq!(gateway.calls(), vec!["update_grocery_list"]);
        assert!(gateway.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_transaction_failure_is_partial_completion() {
        let gateway =
            FakeGateway::with_list(sample_list(1, "Weekly Shopping")).failing_transaction_create();

        let result = complete_checkout(&gateway, request(1, 18.75)).await;

        assert!(matches!(result, Err(Error::PartialCompletion { list_id: 1, .. })));
        let list = gateway.list(1).unwrap();
        assert!(list.completed_at.is_some());
        assert_eq!(list.total_amount, Some(18.75));
        assert!(gateway.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_against_database() -> Result<()> {
        let (db, list) = setup_with_list().await?;
        let food = create_test_category(&db, "Food").await?;
        let gateway = SeaOrmGateway::new(db);

        let receipt = complete_checkout(
            &gateway,
            CheckoutRequest {
                category_id: Some(food.id),
                ..request(list.id, 42.50)
            },
        )
        .await?;

        let db = gateway.connection();
        let stored_list = grocery::get_list(db, list.id).await?.unwrap();
        assert_eq!(stored_list, receipt.list);
        assert_eq!(stored_list.total_amount, Some(42.50));

        let transactions = budget::get_transactions(db, TEST_USER, DateRange::all()).await?;
        assert_eq!(transactions, vec![receipt.transaction]);
        assert_eq!(transactions[0].category_id, Some(food.id));

        let renamed = gateway
            .update_grocery_list(
                list.id,
                GroceryListUpdate {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(renamed, Err(Error::ListCompleted { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_missing_list_is_upstream_failure() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = SeaOrmGateway::new(db);

        let result = complete_checkout(&gateway, request(404, 5.0)).await;
        assert!(matches!(result, Err(Error::UpstreamWriteFailure { .. })));

        let transactions =
            budget::get_transactions(gateway.connection(), TEST_USER, DateRange::all()).await?;
        assert!(transactions.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_checkout_records_twice() -> Result<()> {
        // Completion is not re-checked, so a second checkout records a second expense
        let (db, list) = setup_with_list().await?;
        let gateway = SeaOrmGateway::new(db);

        complete_checkout(&gateway, request(list.id, 20.0)).await?;
        complete_checkout(&gateway, request(list.id, 20.0)).await?;

        let transactions =
            budget::get_transactions(gateway.connection(), TEST_USER, DateRange::all()).await?;
        assert_eq!(transactions.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_preview() -> Result<()> {
        let (db, list) = setup_with_list().await?;
        for (name, price) in [("Milk", Some(2.5)), ("Oats", Some(3.0)), ("Salt", None)] {
            grocery::add_item(
                &db,
                list.id,
                NewGroceryItem {
                    name: name.to_string(),
                    quantity: 1,
                    estimated_price: price,
                },
            )
            .await?;
        }
        let gateway = SeaOrmGateway::new(db);

        let preview = checkout_preview(&gateway, list.id).await?;
        assert_eq!(preview.items.len(), 3);
        assert_eq!(preview.estimated_total, 5.5);
        assert_eq!(preview.progress_percent, 0.0);

        Ok(())
    }
}
