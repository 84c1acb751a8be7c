//! Narrowing a set of transactions down by a text query and a date range.

use time::Date;

use crate::transaction::{TransactionRecord, short_date};

/// An inclusive range of calendar dates. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// The earliest date to include, if any.
    pub start: Option<Date>,
    /// The latest date to include, if any.
    pub end: Option<Date>,
}

impl DateRange {
    /// Create a date range. A `start` after `end` is allowed and contains no dates.
    pub fn new(start: Option<Date>, end: Option<Date>) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the range. Both ends are inclusive.
    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Get the transactions that fall inside `date_range` and match `query`.
///
/// An empty query matches every transaction. Otherwise the query is matched,
/// ignoring case, as a substring of the category, status or user name, of the
/// amount written as a plain decimal (e.g. "40.5"), or of the short date
/// (e.g. "1/5/2024"). Missing fields simply do not match.
///
/// The returned transactions are in the same order as `records`.
pub fn filter_transactions(
    records: &[TransactionRecord],
    query: &str,
    date_range: DateRange,
) -> Vec<TransactionRecord> {
    let query = query.to_lowercase();

    records
        .iter()
        .filter(|record| date_range.contains(record.date) && matches_query(record, &query))
        .cloned()
        .collect()
}

fn matches_query(record: &TransactionRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(record.category.as_str())
        || record.status.as_deref().is_some_and(contains)
        || record.user_name.as_deref().is_some_and(contains)
        || record.amount.is_some_and(|_| record.plain_amount().contains(query))
        || short_date(record.date).contains(query)
}
