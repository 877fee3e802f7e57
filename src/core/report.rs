//! Report generation business logic.
//!
//! This module assembles the dashboard view from a transaction snapshot and provides the
//! text formatting used when summaries are printed. All functions are framework-agnostic
//! and return structured data that a presentation layer can render.

use crate::{
    config::settings::AppConfig,
    core::aggregation::{
        self, BalanceSummary, BudgetStatus, BudgetThresholds, CategorySpending, CategoryTotals,
    },
    entities::{category, transaction, transaction::TransactionKind},
    errors::Result,
    gateway::PersistenceGateway,
};
use chrono::{DateTime, NaiveDate, Utc};

/// A category whose spending has reached at least the warning threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAlert {
    /// Category name
    pub category_name: String,
    /// Amount spent in the window
    pub spent: f64,
    /// The category's limit
    pub limit: f64,
    /// How far along the limit spending is
    pub status: BudgetStatus,
}

/// Everything the dashboard shows for one window of transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Income, expenses, and balance
    pub balance: BalanceSummary,
    /// Share of income kept, as a percentage
    pub savings_rate: f64,
    /// Expenses per category label, first-seen order
    pub expenses_by_category: CategoryTotals,
    /// Category with the most spending
    pub top_category: Option<String>,
    /// Daily expense totals ending today, oldest first
    pub daily_expenses: Vec<f64>,
    /// Per-category spending, largest first
    pub category_spending: Vec<CategorySpending>,
    /// Categories at or past their warning threshold
    pub alerts: Vec<BudgetAlert>,
}

/// Builds alerts for categories whose spending reached the warning threshold.
#[must_use]
pub fn budget_alerts(
    spending: &[CategorySpending],
    thresholds: &BudgetThresholds,
) -> Vec<BudgetAlert> {
    spending
        .iter()
        .filter_map(|s| {
            let limit = s.category.budget_limit?;
            let status = aggregation::budget_status(s.total, Some(limit), thresholds);
            matches!(
                status,
                BudgetStatus::Warning | BudgetStatus::Critical | BudgetStatus::Overspent
            )
            .then(|| BudgetAlert {
                category_name: s.category.name.clone(),
                spent: s.total,
                limit,
                status,
            })
        })
        .collect()
}

/// Assembles the dashboard from an already-fetched snapshot.
#[must_use]
pub fn build_dashboard(
    transactions: &[transaction::Model],
    categories: &[category::Model],
    daily_series_days: u32,
    thresholds: &BudgetThresholds,
    today: NaiveDate,
) -> DashboardSummary {
    let balance = aggregation::monthly_balance(transactions);
    let expenses_by_category = aggregation::expenses_by_category(transactions, categories);
    let top_category = aggregation::top_category(&expenses_by_category).map(str::to_string);
    let category_spending = aggregation::category_spending(categories, transactions);

    DashboardSummary {
        savings_rate: aggregation::savings_rate(balance.income, balance.balance),
        daily_expenses: aggregation::daily_series(
            transactions,
            TransactionKind::Expense,
            daily_series_days,
            today,
        ),
        alerts: budget_alerts(&category_spending, thresholds),
        balance,
        expenses_by_category,
        top_category,
        category_spending,
    }
}

/// Fetches the configured window for `owner_id` and builds its dashboard.
pub async fn load_dashboard<G>(
    gateway: &G,
    owner_id: &str,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<DashboardSummary>
where
    G: PersistenceGateway,
{
    let range = config.dashboard.time_range.window(now);
    let transactions = gateway.list_transactions(owner_id, range).await?;
    let categories = gateway.list_categories(owner_id).await?;

    Ok(build_dashboard(
        &transactions,
        &categories,
        config.dashboard.daily_series_days,
        &config.thresholds,
        now.date_naive(),
    ))
}

/// Formats a dollar amount like `$12.50` or `-$3.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Formats a transaction amount with its direction, e.g. `+$50.00` or `-$25.50`.
#[must_use]
pub fn format_transaction_amount(transaction: &transaction::Model) -> String {
    match transaction.kind {
        TransactionKind::Income => format!("+${:.2}", transaction.amount),
        TransactionKind::Expense => format!("-${:.2}", transaction.amount),
    }
}

/// Formats a percentage with one decimal, e.g. `33.3%`.
#[must_use]
pub fn format_percentage(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Generates a text bar of spending against a limit, like `[████████░░] 80.0%`.
///
/// The bar is clamped to full; the percentage is not.
#[must_use]
pub fn format_budget_bar(spent: f64, limit: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let percent = aggregation::category_percentage(spent, limit);
    let clamped = percent.clamp(0.0, 100.0);

    // Cast safety: clamped ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {}",
        "█".repeat(filled),
        "░".repeat(empty),
        format_percentage(percent)
    )
}
