//! Application router configuration.

use std::path::Path;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{
        export_transactions_csv, get_dashboard_page, get_transactions_json,
        reload_snapshot_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
///
/// Static files such as the stylesheet are served from `static_dir`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_API, get(get_transactions_json))
        .route(endpoints::EXPORT_CSV, get(export_transactions_csv))
        .route(endpoints::SNAPSHOT_RELOAD, post(reload_snapshot_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new(static_dir))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
