//! Aggregation engine - Totals, balances, and per-category breakdowns.
//!
//! Every function here is pure: it takes a snapshot of already-fetched transactions and
//! returns derived values without touching the database. Callers scope the snapshot to one
//! user (and optionally a [`DateRange`]) before handing it over. Nothing in this module can
//! fail; missing categories degrade to [`UNCATEGORIZED`].

use crate::entities::{category, transaction, transaction::TransactionKind};
use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Label used for expenses without a (known) category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Inclusive time window for transaction queries. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Earliest `occurred_at` included
    pub start: Option<DateTime<Utc>>,
    /// Latest `occurred_at` included
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// A range with no bounds.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// A range starting at `start` with no upper bound.
    #[must_use]
    pub const fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Whether `timestamp` falls inside the range.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| timestamp >= start)
            && self.end.is_none_or(|end| timestamp <= end)
    }
}

/// Dashboard time windows, measured back from "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// The last seven days
    Week,
    /// The last calendar month
    #[default]
    Month,
    /// The last twelve months
    Year,
}

impl TimeRange {
    /// Returns the window ending now and reaching back one week, month, or year.
    #[must_use]
    pub fn window(self, now: DateTime<Utc>) -> DateRange {
        let start = match self {
            Self::Week => now.checked_sub_days(Days::new(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::Year => now.checked_sub_months(Months::new(12)),
        };
        DateRange { start, end: None }
    }
}

/// Summed amounts keyed by category label, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(String, f64)>,
}

impl CategoryTotals {
    /// Adds `amount` to `label`, appending the label if it has not been seen yet.
    pub fn add(&mut self, label: &str, amount: f64) {
        if let Some((_, total)) = self.entries.iter_mut().find(|(l, _)| l == label) {
            *total += amount;
        } else {
            self.entries.push((label.to_string(), amount));
        }
    }

    /// The summed amount for `label`, if present.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, total)| *total)
    }

    /// Iterates `(label, total)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, total)| (l.as_str(), *total))
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no labels have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all labels.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }
}

/// Income, expenses, and their difference over one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSummary {
    /// Total income
    pub income: f64,
    /// Total expenses
    pub expenses: f64,
    /// `income - expenses`
    pub balance: f64,
}

/// Spending within one category, relative to all expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    /// The category
    pub category: category::Model,
    /// Summed expense amount
    pub total: f64,
    /// Share of all expenses, 0-100
    pub percentage: f64,
}

/// Spent-to-limit ratios at which a category changes [`BudgetStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BudgetThresholds {
    /// Ratio from which spending is flagged as approaching the limit
    pub warning: f64,
    /// Ratio from which the limit counts as reached
    pub critical: f64,
    /// Ratio from which the category counts as overspent
    pub overspent: f64,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            warning: 0.8,
            critical: 1.0,
            overspent: 1.2,
        }
    }
}

/// Where a category's spending sits relative to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// The category has no positive limit
    NoLimit,
    /// Below the warning threshold
    OnTrack,
    /// At or above the warning threshold
    Warning,
    /// At or above the limit
    Critical,
    /// At or above the overspent threshold
    Overspent,
}

/// Sums `amount` over transactions of the given kind. Returns 0 for empty input.
#[must_use]
pub fn total_by_kind(transactions: &[transaction::Model], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Income minus expenses. May be negative.
#[must_use]
pub fn balance(transactions: &[transaction::Model]) -> f64 {
    total_by_kind(transactions, TransactionKind::Income)
        - total_by_kind(transactions, TransactionKind::Expense)
}

/// Income, expenses, and balance for the snapshot, as shown on the budget overview.
#[must_use]
pub fn monthly_balance(transactions: &[transaction::Model]) -> BalanceSummary {
    let income = total_by_kind(transactions, TransactionKind::Income);
    let expenses = total_by_kind(transactions, TransactionKind::Expense);
    BalanceSummary {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Sums expenses per category name.
///
/// Transactions with no category, or whose category is not in `categories` (for example
/// because it was deleted), are reported under [`UNCATEGORIZED`]. Labels appear in the
/// order their first transaction appears in `transactions`.
#[must_use]
pub fn expenses_by_category(
    transactions: &[transaction::Model],
    categories: &[category::Model],
) -> CategoryTotals {
    let names: HashMap<i64, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut totals = CategoryTotals::default();
    for t in transactions.iter().filter(|t| t.kind == TransactionKind::Expense) {
        let label = t
            .category_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or(UNCATEGORIZED);
        totals.add(label, t.amount);
    }
    totals
}

/// A category's share of total expenses as a percentage, unrounded.
///
/// Returns 0 when there are no expenses.
#[must_use]
pub fn category_percentage(category_total: f64, total_expenses: f64) -> f64 {
    if total_expenses == 0.0 {
        return 0.0;
    }

    category_total / total_expenses * 100.0
}

/// Per-day sums of one kind for the `days` calendar days ending at `anchor`, oldest first.
///
/// Days are the UTC calendar date of `occurred_at`. Transactions outside the window are
/// ignored.
#[must_use]
pub fn daily_series(
    transactions: &[transaction::Model],
    kind: TransactionKind,
    days: u32,
    anchor: NaiveDate,
) -> Vec<f64> {
    let mut buckets = vec![0.0; days as usize];
    let last = i64::from(days) - 1;

    for t in transactions.iter().filter(|t| t.kind == kind) {
        // Whole days between the transaction and the anchor; 0 lands in the last bucket
        let days_back = (anchor - t.occurred_at.date_naive()).num_days();
        if !(0..=last).contains(&days_back) {
            continue;
        }
        let Ok(index) = usize::try_from(last - days_back) else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(index) {
            *bucket += t.amount;
        }
    }

    buckets
}

/// The label with the largest total. On a tie the label inserted first wins.
#[must_use]
pub fn top_category(totals: &CategoryTotals) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (label, total) in totals.iter() {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((label, total)),
        }
    }
    best.map(|(label, _)| label)
}

/// Share of income kept, as a percentage. Returns 0 when there is no income.
#[must_use]
pub fn savings_rate(income: f64, balance: f64) -> f64 {
    if income == 0.0 {
        return 0.0;
    }

    balance / income * 100.0
}

/// Spending per category, largest first, omitting categories with nothing spent.
///
/// Percentages are relative to all expenses in the snapshot, including uncategorized ones.
/// Equal totals keep the order of `categories`.
#[must_use]
pub fn category_spending(
    categories: &[category::Model],
    transactions: &[transaction::Model],
) -> Vec<CategorySpending> {
    let expenses: Vec<&transaction::Model> = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .collect();
    let total_expenses: f64 = expenses.iter().map(|t| t.amount).sum();

    let mut per_category: HashMap<i64, f64> = HashMap::new();
    for t in &expenses {
        if let Some(id) = t.category_id {
            *per_category.entry(id).or_insert(0.0) += t.amount;
        }
    }

    let mut spending: Vec<CategorySpending> = categories
        .iter()
        .filter_map(|category| {
            let total = per_category.get(&category.id).copied().unwrap_or(0.0);
            (total > 0.0).then(|| CategorySpending {
                category: category.clone(),
                total,
                percentage: category_percentage(total, total_expenses),
            })
        })
        .collect();

    spending.sort_by(|a, b| b.total.total_cmp(&a.total));
    spending
}

/// Classifies `spent` against an optional `limit`.
#[must_use]
pub fn budget_status(spent: f64, limit: Option<f64>, thresholds: &BudgetThresholds) -> BudgetStatus {
    let Some(limit) = limit.filter(|l| *l > 0.0) else {
        return BudgetStatus::NoLimit;
    };

    let ratio = spent / limit;
    if ratio >= thresholds.overspent {
        BudgetStatus::Overspent
    } else if ratio >= thresholds.critical {
        BudgetStatus::Critical
    } else if ratio >= thresholds.warning {
        BudgetStatus::Warning
    } else {
        BudgetStatus::OnTrack
    }
}
