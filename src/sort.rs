//! Ordering transactions for the table and CSV export.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::transaction::TransactionRecord;

/// The field to sort transactions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Chronological order.
    Date,
    /// Numeric order, with a missing amount sorted as zero.
    Amount,
    /// Alphabetical order of the display name, ignoring case.
    UserName,
}

impl SortKey {
    /// The value used for this key in URL query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::UserName => "user_name",
        }
    }
}

/// Whether to sort in ascending or descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// The value used for this direction in URL query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A sort key together with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// The field to sort by.
    pub key: SortKey,
    /// The order to sort in.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort spec.
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        SortOrder::default().into()
    }
}

/// The sort orders offered in the table's "sort by" menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    DateDesc,
    /// Oldest first.
    DateAsc,
    /// Largest amount first.
    AmountDesc,
    /// Smallest amount first.
    AmountAsc,
}

impl SortOrder {
    /// Every sort order, in the order they are listed in the menu.
    pub const ALL: [Self; 4] = [
        Self::DateDesc,
        Self::DateAsc,
        Self::AmountDesc,
        Self::AmountAsc,
    ];

    /// The value used for this sort order in URL query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::AmountDesc => "amount-desc",
            Self::AmountAsc => "amount-asc",
        }
    }

    /// A human readable label for the menu.
    pub fn label(self) -> &'static str {
        match self {
            Self::DateDesc => "Newest first",
            Self::DateAsc => "Oldest first",
            Self::AmountDesc => "Highest amount",
            Self::AmountAsc => "Lowest amount",
        }
    }
}

impl From<SortOrder> for SortSpec {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::DateDesc => SortSpec::new(SortKey::Date, SortDirection::Desc),
            SortOrder::DateAsc => SortSpec::new(SortKey::Date, SortDirection::Asc),
            SortOrder::AmountDesc => SortSpec::new(SortKey::Amount, SortDirection::Desc),
            SortOrder::AmountAsc => SortSpec::new(SortKey::Amount, SortDirection::Asc),
        }
    }
}

/// Get the sort spec to use after the user clicks the header for `clicked`.
///
/// Clicking the column that is already sorted flips the direction. Clicking
/// any other column sorts by that column in ascending order.
pub fn toggle_sort(current: Option<SortSpec>, clicked: SortKey) -> SortSpec {
    match current {
        Some(current) if current.key == clicked => {
            SortSpec::new(clicked, current.direction.reversed())
        }
        _ => SortSpec::new(clicked, SortDirection::Asc),
    }
}

/// Get a copy of `records` sorted by `spec`.
///
/// The sort is stable: transactions that compare equal keep the order they
/// have in `records`, in both directions.
pub fn sort_transactions(records: &[TransactionRecord], spec: SortSpec) -> Vec<TransactionRecord> {
    let mut sorted = records.to_vec();

    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, spec.key);

        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    sorted
}

fn compare(a: &TransactionRecord, b: &TransactionRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Amount => a.amount_or_zero().total_cmp(&b.amount_or_zero()),
        SortKey::UserName => a
            .display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase()),
    }
}
