//! Dashboard module
//!
//! Provides the overview page with metric cards, the income and expenses
//! chart, the recent transactions panel and the transactions table, plus the
//! CSV export and JSON API that share its query parameters.

mod cards;
mod charts;
mod controls;
mod handlers;
mod query;
mod tables;

pub use handlers::{
    export_transactions_csv, get_dashboard_page, get_transactions_json, reload_snapshot_endpoint,
};
