//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page, the CSV export, the JSON API and reloading the snapshot
//! - The HTML view function for the dashboard page
//! - The state type used by the handlers

use std::sync::{Arc, RwLock};

use axum::{
    extract::{FromRef, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Serialize;

use crate::{
    AppState, DashboardSettings, Error,
    aggregation::BucketTotals,
    app_state::{current_snapshot, reload_snapshot},
    dashboard::{
        cards::metric_cards_view,
        charts::{
            DashboardChart, ECHARTS_SCRIPT_URL, charts_script, charts_view, income_expenses_chart,
        },
        controls::controls_view,
        query::DashboardQuery,
        tables::{recent_transactions_panel, transactions_table},
    },
    endpoints,
    export::{CSV_CONTENT_TYPE, CSV_FILE_NAME},
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    metrics::Metrics,
    navigation::NavBar,
    snapshot::{Snapshot, SnapshotSource},
    transaction::TransactionRecord,
    view::{DashboardView, ViewParams},
};

/// The state needed by the dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The snapshot currently being displayed.
    pub snapshot: Arc<RwLock<Arc<Snapshot>>>,
    /// Where snapshots are read from when reloading.
    pub source: Arc<dyn SnapshotSource>,
    /// The display settings for the dashboard.
    pub settings: DashboardSettings,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            snapshot: state.snapshot.clone(),
            source: state.source.clone(),
            settings: state.settings,
        }
    }
}

impl DashboardState {
    /// Build the view of the current snapshot for `query`.
    fn build_view(&self, query: &DashboardQuery) -> Result<(DashboardView, ViewParams), Error> {
        let params = query.to_view_params(&self.settings)?;
        let snapshot = current_snapshot(&self.snapshot)?;
        let view = DashboardView::build(&snapshot, &params, self.settings.recent_count);

        Ok((view, params))
    }
}

/// Display the dashboard for the filters, sort and columns in the query string.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let (view, params) = state.build_view(&query)?;
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    Ok(dashboard_view(nav_bar, &view, &params, &query).into_response())
}

/// Download the rows of the transactions table as a CSV file.
///
/// Takes the same query parameters as the dashboard page, so the file has
/// exactly the rows shown on screen, in the same order.
pub async fn export_transactions_csv(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let (view, _) = state.build_view(&query)?;
    let csv = view.to_csv()?;

    tracing::debug!("Exporting {} transactions as CSV", view.rows.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

#[derive(Serialize)]
struct TransactionsResponse<'a> {
    rows: &'a [TransactionRecord],
    metrics: Metrics,
    series: &'a [BucketTotals],
    total: usize,
    rejected_count: usize,
}

/// Get the filtered transactions, their metrics and the chart series as JSON.
pub async fn get_transactions_json(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let (view, _) = state.build_view(&query)?;

    let body = serde_json::to_string(&TransactionsResponse {
        rows: &view.rows,
        metrics: view.metrics,
        series: &view.series,
        total: view.snapshot_size,
        rejected_count: view.rejected_count,
    })
    .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// Read the snapshot source again and redirect back to the dashboard.
///
/// The current snapshot is kept if the source could not be read.
pub async fn reload_snapshot_endpoint(
    State(state): State<DashboardState>,
) -> Result<Redirect, Error> {
    let snapshot = reload_snapshot(&state.snapshot, state.source.as_ref())?;

    tracing::info!(
        "Reloaded snapshot with {} transactions",
        snapshot.records().len()
    );

    Ok(Redirect::to(endpoints::DASHBOARD_VIEW))
}

/// Renders the dashboard page.
fn dashboard_view(
    nav_bar: NavBar,
    view: &DashboardView,
    params: &ViewParams,
    query: &DashboardQuery,
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let charts = [DashboardChart {
        id: "income-expenses-chart",
        options: income_expenses_chart(&view.series, params.granularity).to_string(),
    }];

    let content = html!(
        (nav_bar)

        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            @if view.rejected_count > 0 {
                div
                    id="rejected-notice"
                    role="alert"
                    class="w-full mb-4 p-4 text-sm rounded-lg text-yellow-800 bg-yellow-50
                        dark:bg-slate-800 dark:text-yellow-300"
                {
                    (view.rejected_count) " of the records in the snapshot could not be read
                    and were left out. Check the server logs for details."
                }
            }

            (controls_view(query, &params.columns))

            (metric_cards_view(&view.metrics))

            div class="w-full grid grid-cols-1 xl:grid-cols-3 gap-4 mb-4"
            {
                div class="xl:col-span-2"
                {
                    (charts_view(&charts))
                }

                (recent_transactions_panel(&view.recent))
            }

            (transactions_table(&view.rows, &params.columns, query))

            p id="row-count" class="w-full mt-2 text-sm text-slate-500 dark:text-slate-400"
            {
                "Showing " (view.rows.len()) " of " (view.snapshot_size) " transactions"
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, RwLock};

    use axum::{
        Router,
        extract::State,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_extra::extract::Query;
    use axum_test::TestServer;
    use scraper::{Html, Selector};

    use crate::{
        DashboardSettings, Error, endpoints,
        snapshot::{Snapshot, SnapshotSource},
        test_utils::{assert_content_type, assert_valid_html, get_header, parse_html_document},
    };

    use super::{
        DashboardQuery, DashboardState, export_transactions_csv, get_dashboard_page,
        get_transactions_json, reload_snapshot_endpoint,
    };

    const SNAPSHOT: &str = r#"[
        {"id": 1, "date": "2024-01-05", "amount": 100, "category": "revenue",
            "status": "paid", "user_name": "Ada"},
        {"id": 2, "date": "2024-01-20", "amount": 40, "category": "expense",
            "user_name": "Grace"},
        {"id": 3, "date": "2024-02-14", "amount": "15.5", "category": "expense",
            "status": "paid", "user_name": "Ada"},
        {"id": 4, "date": "not a date", "amount": 1, "category": "expense"}
    ]"#;

    #[derive(Debug)]
    struct StubSource(Mutex<String>);

    impl SnapshotSource for StubSource {
        fn fetch(&self) -> Result<String, Error> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    fn get_test_state(json: &str) -> (DashboardState, Arc<StubSource>) {
        let source = Arc::new(StubSource(Mutex::new(json.to_owned())));
        let snapshot = Snapshot::from_json(json).unwrap();
        let state = DashboardState {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            source: source.clone(),
            settings: DashboardSettings::default(),
        };

        (state, source)
    }

    fn get_test_server(state: DashboardState) -> TestServer {
        let app = Router::new()
            .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
            .route(endpoints::EXPORT_CSV, get(export_transactions_csv))
            .route(endpoints::TRANSACTIONS_API, get(get_transactions_json))
            .route(endpoints::SNAPSHOT_RELOAD, post(reload_snapshot_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn select_texts(html: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    fn metric_value(html: &Html, metric: &str) -> String {
        let selector = format!("[data-metric='{metric}'] span:last-child");
        select_texts(html, &selector).concat()
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let (state, _) = get_test_state(SNAPSHOT);

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(metric_value(&html, "balance"), "$155.50");
        assert_eq!(metric_value(&html, "revenue"), "$100.00");
        assert_eq!(metric_value(&html, "expenses"), "$55.50");
        assert_eq!(metric_value(&html, "savings"), "$44.50");

        let chart = Selector::parse("#income-expenses-chart").unwrap();
        assert!(html.select(&chart).next().is_some());
        assert_eq!(select_texts(&html, "#transactions tbody tr").len(), 3);
        assert_eq!(
            select_texts(&html, "#row-count"),
            vec!["Showing 3 of 3 transactions"]
        );
    }

    #[tokio::test]
    async fn dashboard_reports_rejected_records() {
        let (state, _) = get_test_state(SNAPSHOT);

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let notice = select_texts(&html, "#rejected-notice");
        assert_eq!(notice.len(), 1);
        assert!(notice[0].starts_with("1 of the records"), "{notice:?}");
    }

    #[tokio::test]
    async fn dashboard_applies_query() {
        let (state, _) = get_test_state(SNAPSHOT);
        let server = get_test_server(state);

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("search", "ada")
            .add_query_param("sort_key", "date")
            .add_query_param("direction", "asc")
            .add_query_param("columns", "name")
            .add_query_param("columns", "amount")
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        assert_eq!(select_texts(&html, "#transactions thead th"), vec!["Name", "Amount"]);
        let amounts = select_texts(&html, "#transactions tbody td:last-child");
        assert_eq!(amounts, vec!["+$100.00", "-$15.50"]);
        assert_eq!(metric_value(&html, "balance"), "$115.50");
    }

    #[tokio::test]
    async fn dashboard_shows_empty_state() {
        let (state, _) = get_test_state(SNAPSHOT);
        let server = get_test_server(state);

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("search", "nobody")
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_eq!(
            select_texts(&html, "td[data-empty-state]"),
            vec!["No transactions found for \"nobody\""]
        );
        assert_eq!(metric_value(&html, "balance"), "$0.00");
    }

    #[tokio::test]
    async fn invalid_date_is_bad_request() {
        let (state, _) = get_test_state(SNAPSHOT);
        let server = get_test_server(state);

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("start", "yesterday")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_matches_table_rows() {
        let (state, _) = get_test_state(SNAPSHOT);

        let response = export_transactions_csv(
            State(state),
            Query(DashboardQuery {
                search: Some("ada".to_owned()),
                sort_order: Some(crate::sort::SortOrder::AmountAsc),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/csv;charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"transactions.csv\""
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&body),
            "Name,Date,Amount,Status\nAda,2/14/2024,-$15.50,paid\nAda,1/5/2024,+$100.00,paid"
        );
    }

    #[tokio::test]
    async fn json_api_returns_view_data() {
        let (state, _) = get_test_state(SNAPSHOT);
        let server = get_test_server(state);

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("end", "2024-01-31")
            .await;

        response.assert_status_ok();
        let json: serde_json::Value = response.json();
        assert_eq!(json["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["rows"][0]["date"], "2024-01-20");
        assert_eq!(json["metrics"]["balance"], 140.0);
        assert_eq!(json["metrics"]["savings"], 60.0);
        assert_eq!(json["series"][0]["label"], "Jan");
        assert_eq!(json["total"], 3);
        assert_eq!(json["rejected_count"], 1);
    }

    #[tokio::test]
    async fn reload_replaces_snapshot_and_redirects() {
        let (state, source) = get_test_state(SNAPSHOT);
        let server = get_test_server(state.clone());

        *source.0.lock().unwrap() =
            r#"[{"id": 9, "date": "2024-03-01", "amount": 5, "category": "revenue"}]"#.to_owned();
        let response = server.post(endpoints::SNAPSHOT_RELOAD).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);
        let snapshot = state.snapshot.read().unwrap().clone();
        assert_eq!(snapshot.records().len(), 1);
        assert_eq!(snapshot.records()[0].id, 9);
    }

    #[tokio::test]
    async fn failed_reload_keeps_snapshot() {
        let (state, source) = get_test_state(SNAPSHOT);
        let server = get_test_server(state.clone());

        *source.0.lock().unwrap() = "not json".to_owned();
        let response = server.post(endpoints::SNAPSHOT_RELOAD).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.snapshot.read().unwrap().records().len(), 3);
    }
}
