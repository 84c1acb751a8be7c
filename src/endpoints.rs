//! The URIs of the pages and API endpoints.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to get the filtered transactions, metrics and chart series as JSON.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to download the filtered transactions as CSV.
pub const EXPORT_CSV: &str = "/api/transactions/export";
/// The route to read the transaction snapshot again.
pub const SNAPSHOT_RELOAD: &str = "/api/snapshot/reload";
