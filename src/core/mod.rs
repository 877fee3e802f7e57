//! Core business logic - framework-agnostic budgeting, grocery, and wallet operations.

/// Pure totals, balances, and category breakdowns over transaction snapshots
pub mod aggregation;
/// Category and transaction storage operations
pub mod budget;
/// Grocery checkout into budget expenses
pub mod checkout;
/// Grocery list and item storage operations
pub mod grocery;
/// User profile storage operations
pub mod profile;
/// Dashboard assembly and text formatting
pub mod report;
/// Wallet card storage operations
pub mod wallet;
