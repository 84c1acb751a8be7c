//! Deriving everything the dashboard shows from one set of view parameters.
//!
//! The snapshot is filtered once per view. The table rows, metrics, chart
//! series and CSV export are all computed from that same filtered set, so
//! they always agree with each other.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    aggregation::{BucketOrder, BucketTotals, Granularity, aggregate},
    export::export_csv,
    filter::{DateRange, filter_transactions},
    metrics::{Metrics, compute_metrics},
    snapshot::Snapshot,
    sort::{SortDirection, SortKey, SortSpec, sort_transactions},
    transaction::TransactionRecord,
};

/// A column of the transactions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    /// The user's avatar and display name.
    Name,
    /// The transaction date.
    Date,
    /// The signed amount.
    Amount,
    /// The payment status.
    Status,
}

impl Column {
    /// Every column, in the order they are displayed.
    pub const ALL: [Self; 4] = [Self::Name, Self::Date, Self::Amount, Self::Status];

    /// The value used for this column in URL query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Status => "status",
        }
    }

    /// The column heading.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::Status => "Status",
        }
    }

    /// The key the table is sorted by when the column heading is clicked, if
    /// the column is sortable.
    pub fn sort_key(self) -> Option<SortKey> {
        match self {
            Self::Name => Some(SortKey::UserName),
            Self::Date => Some(SortKey::Date),
            Self::Amount => Some(SortKey::Amount),
            Self::Status => None,
        }
    }
}

/// The columns to show in the transactions table.
///
/// Only affects what is displayed, never what is counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection(Vec<Column>);

impl ColumnSelection {
    /// Select `columns`, kept in display order with duplicates removed.
    ///
    /// Selecting no columns selects all of them.
    pub fn new(columns: &[Column]) -> Self {
        let selected: Vec<Column> = Column::ALL
            .into_iter()
            .filter(|column| columns.contains(column))
            .collect();

        if selected.is_empty() {
            Self::default()
        } else {
            Self(selected)
        }
    }

    /// Whether `column` is shown.
    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    /// The selected columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.0
    }
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self(Column::ALL.to_vec())
    }
}

/// Everything that controls what the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewParams {
    /// Free text matched against the transactions.
    pub query: String,
    /// The dates to include.
    pub date_range: DateRange,
    /// The order of the table rows and CSV rows.
    pub sort: SortSpec,
    /// The size of the chart buckets.
    pub granularity: Granularity,
    /// The order of the chart buckets.
    pub bucket_order: BucketOrder,
    /// The table columns to show.
    pub columns: ColumnSelection,
}

/// The data behind one rendering of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// The filtered transactions in table order.
    pub rows: Vec<TransactionRecord>,
    /// Totals over the filtered transactions.
    pub metrics: Metrics,
    /// The filtered transactions bucketed for the chart.
    pub series: Vec<BucketTotals>,
    /// The newest transactions in the whole snapshot, ignoring filters.
    pub recent: Vec<TransactionRecord>,
    /// The number of transactions in the snapshot.
    pub snapshot_size: usize,
    /// The number of records that were left out of the snapshot.
    pub rejected_count: usize,
}

impl DashboardView {
    /// Build the view of `snapshot` for `params`.
    ///
    /// `recent_count` is the number of newest transactions to list in the
    /// recent transactions panel.
    pub fn build(snapshot: &Snapshot, params: &ViewParams, recent_count: usize) -> Self {
        let filtered = filter_transactions(snapshot.records(), &params.query, params.date_range);

        tracing::debug!(
            "{} of {} transactions match {params:?}",
            filtered.len(),
            snapshot.records().len()
        );

        let metrics = compute_metrics(&filtered);
        let series = aggregate(&filtered, params.granularity, params.bucket_order);
        let rows = sort_transactions(&filtered, params.sort);

        Self {
            rows,
            metrics,
            series,
            recent: recent_transactions(snapshot.records(), recent_count),
            snapshot_size: snapshot.records().len(),
            rejected_count: snapshot.rejected().len(),
        }
    }

    /// The table rows as CSV text, in table order.
    ///
    /// # Errors
    /// Returns [Error::CsvError] if the CSV could not be written.
    pub fn to_csv(&self) -> Result<String, Error> {
        export_csv(&self.rows)
    }
}

/// Get the `count` newest transactions, newest first.
///
/// Transactions on the same date keep the order they have in `records`.
pub fn recent_transactions(records: &[TransactionRecord], count: usize) -> Vec<TransactionRecord> {
    let mut recent = sort_transactions(records, SortSpec::new(SortKey::Date, SortDirection::Desc));
    recent.truncate(count);
    recent
}

/// The caption for a transaction in the recent transactions panel.
pub fn transfer_label(record: &TransactionRecord) -> &'static str {
    if record.is_revenue() {
        "Transfer from"
    } else {
        "Transfer to"
    }
}

/// The message shown in place of the table rows when nothing matches.
pub fn empty_table_message(query: &str) -> String {
    if query.is_empty() {
        "No transactions available".to_owned()
    } else {
        format!("No transactions found for \"{query}\"")
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        aggregation::Granularity,
        filter::DateRange,
        snapshot::Snapshot,
        sort::{SortOrder, SortSpec},
        transaction::{Category, TransactionRecord},
    };

    use super::{
        Column, ColumnSelection, DashboardView, ViewParams, empty_table_message,
        recent_transactions, transfer_label,
    };

    fn ids(records: &[TransactionRecord]) -> Vec<i64> {
        records.iter().map(|record| record.id).collect()
    }

    fn sample_snapshot() -> Snapshot {
        Snapshot::from_records(vec![
            TransactionRecord::new(1, date!(2024 - 01 - 05), Category::Revenue)
                .amount(100.0)
                .user_name("Ada")
                .status("paid"),
            TransactionRecord::new(2, date!(2024 - 01 - 20), Category::Expense)
                .amount(40.0)
                .user_name("Grace"),
            TransactionRecord::new(3, date!(2024 - 02 - 14), Category::Expense)
                .amount(15.5)
                .user_name("Ada")
                .status("paid"),
            TransactionRecord::new(4, date!(2024 - 03 - 01), Category::Revenue)
                .amount(250.0)
                .user_name("Linus"),
        ])
    }

    #[test]
    fn every_output_comes_from_the_same_filtered_set() {
        let snapshot = sample_snapshot();
        let params = ViewParams {
            query: "ada".to_owned(),
            sort: SortOrder::AmountAsc.into(),
            ..Default::default()
        };

        let view = DashboardView::build(&snapshot, &params, 3);

        assert_eq!(ids(&view.rows), vec![3, 1]);
        assert_eq!(view.metrics.revenue, 100.0);
        assert_eq!(view.metrics.expenses, 15.5);
        assert_eq!(view.metrics.balance, 115.5);

        let income: f64 = view.series.iter().map(|bucket| bucket.income).sum();
        let expenses: f64 = view.series.iter().map(|bucket| bucket.expenses).sum();
        assert_eq!(income, view.metrics.revenue);
        assert_eq!(expenses, view.metrics.expenses);

        assert_eq!(
            view.to_csv().unwrap(),
            "Name,Date,Amount,Status\nAda,2/14/2024,-$15.50,paid\nAda,1/5/2024,+$100.00,paid"
        );
    }

    #[test]
    fn date_range_and_granularity_shape_the_series() {
        let snapshot = sample_snapshot();
        let params = ViewParams {
            date_range: DateRange::new(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 02 - 28))),
            granularity: Granularity::Weekly,
            ..Default::default()
        };

        let view = DashboardView::build(&snapshot, &params, 3);

        assert_eq!(ids(&view.rows), vec![3, 2]);
        let labels: Vec<_> = view.series.iter().map(|bucket| bucket.label.as_str()).collect();
        assert_eq!(labels, vec!["Feb W2", "Jan W3"]);
    }

    #[test]
    fn empty_match_degrades_gracefully() {
        let snapshot = sample_snapshot();
        let params = ViewParams {
            query: "nobody".to_owned(),
            ..Default::default()
        };

        let view = DashboardView::build(&snapshot, &params, 3);

        assert!(view.rows.is_empty());
        assert!(view.series.is_empty());
        assert_eq!(view.metrics, Default::default());
        assert_eq!(view.to_csv().unwrap(), "Name,Date,Amount,Status");
        assert_eq!(view.snapshot_size, 4);
    }

    #[test]
    fn recent_transactions_ignore_filters() {
        let snapshot = sample_snapshot();
        let params = ViewParams {
            query: "grace".to_owned(),
            ..Default::default()
        };

        let view = DashboardView::build(&snapshot, &params, 3);

        assert_eq!(ids(&view.rows), vec![2]);
        assert_eq!(ids(&view.recent), vec![4, 3, 2]);
    }

    #[test]
    fn recent_transactions_handles_short_snapshots() {
        let records = vec![TransactionRecord::new(1, date!(2024 - 01 - 05), Category::Revenue)];

        assert_eq!(ids(&recent_transactions(&records, 3)), vec![1]);
        assert!(recent_transactions(&[], 3).is_empty());
    }

    #[test]
    fn default_params_show_everything_newest_first() {
        let snapshot = sample_snapshot();

        let view = DashboardView::build(&snapshot, &ViewParams::default(), 3);

        assert_eq!(ids(&view.rows), vec![4, 3, 2, 1]);
        assert_eq!(ViewParams::default().sort, SortSpec::from(SortOrder::DateDesc));
    }

    #[test]
    fn transfer_label_depends_on_category() {
        let revenue = TransactionRecord::new(1, date!(2024 - 01 - 05), Category::Revenue);
        let other = TransactionRecord::new(2, date!(2024 - 01 - 05), Category::new("gift"));

        assert_eq!(transfer_label(&revenue), "Transfer from");
        assert_eq!(transfer_label(&other), "Transfer to");
    }

    #[test]
    fn empty_table_message_mentions_query() {
        assert_eq!(empty_table_message(""), "No transactions available");
        assert_eq!(
            empty_table_message("rent"),
            "No transactions found for \"rent\""
        );
    }

    #[test]
    fn column_selection_keeps_display_order() {
        let selection = ColumnSelection::new(&[Column::Status, Column::Name, Column::Status]);

        assert_eq!(selection.columns(), &[Column::Name, Column::Status]);
        assert!(!selection.contains(Column::Date));
    }

    #[test]
    fn empty_column_selection_shows_all_columns() {
        assert_eq!(ColumnSelection::new(&[]), ColumnSelection::default());
        assert_eq!(ColumnSelection::default().columns(), &Column::ALL);
    }
}
