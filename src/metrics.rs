//! Summary totals for the metric cards.

use serde::Serialize;

use crate::transaction::{Category, TransactionRecord};

/// Totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    /// The sum of every amount, whatever its category.
    pub balance: f64,
    /// The sum of amounts categorised as revenue.
    pub revenue: f64,
    /// The sum of amounts categorised as expense.
    pub expenses: f64,
    /// Revenue minus expenses.
    pub savings: f64,
}

/// Compute the totals for `records`.
///
/// The balance is the plain sum of the stored amounts, so an expense only
/// lowers it if it was stored as a negative number. Transactions in a category
/// other than revenue or expense count towards the balance only. A missing
/// amount counts as zero.
pub fn compute_metrics(records: &[TransactionRecord]) -> Metrics {
    let mut metrics = Metrics::default();

    for record in records {
        let amount = record.amount_or_zero();
        metrics.balance += amount;

        match record.category {
            Category::Revenue => metrics.revenue += amount,
            Category::Expense => metrics.expenses += amount,
            Category::Other(_) => {}
        }
    }

    metrics.savings = metrics.revenue - metrics.expenses;

    metrics
}
