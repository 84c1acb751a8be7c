//! Penta is a personal-finance dashboard for a snapshot of transactions.
//!
//! The core of the library is a small analytics pipeline. A JSON snapshot is
//! decoded into a [Snapshot], then [filter_transactions] narrows it down by a
//! text query and date range, and everything the dashboard shows is derived
//! from that one filtered set:
//! - [sort_transactions] orders the table rows,
//! - [compute_metrics] totals the balance, revenue, expenses and savings,
//! - [aggregate] buckets income and expenses by day, week or month,
//! - [export_csv] writes the table rows as CSV.
//!
//! [DashboardView::build] runs the whole pipeline for a set of [ViewParams].
//!
//! The library also provides the HTTP routes that serve the dashboard as HTML
//! pages, see [build_router].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

pub mod aggregation;
mod app_state;
mod dashboard;
mod endpoints;
pub mod export;
pub mod filter;
mod html;
mod internal_server_error;
mod logging;
pub mod metrics;
mod navigation;
mod not_found;
mod routing;
pub mod snapshot;
pub mod sort;
#[cfg(test)]
mod test_utils;
pub mod transaction;
pub mod view;

pub use aggregation::{BucketOrder, BucketTotals, Granularity, aggregate};
pub use app_state::{AppState, DashboardSettings};
pub use export::{CSV_CONTENT_TYPE, CSV_FILE_NAME, export_csv};
pub use filter::{DateRange, filter_transactions};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use metrics::{Metrics, compute_metrics};
pub use routing::build_router;
pub use snapshot::{JsonFileSource, RejectedRecord, Snapshot, SnapshotSource};
pub use sort::{SortDirection, SortKey, SortOrder, SortSpec, sort_transactions, toggle_sort};
pub use transaction::{Category, TransactionRecord};
pub use view::{ColumnSelection, DashboardView, ViewParams};

use crate::{html::error_view, internal_server_error::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for the ctrl+c signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The snapshot text is not a JSON array.
    ///
    /// Problems with individual records do not cause this error, those
    /// records are rejected and the rest of the snapshot is loaded.
    #[error("the transaction snapshot is not a JSON array: {0}")]
    InvalidSnapshot(String),

    /// The snapshot could not be read from its source.
    #[error("could not read the transaction snapshot: {0}")]
    SnapshotReadError(String),

    /// A date in the request could not be parsed.
    ///
    /// Callers should pass in the date string that caused the error.
    #[error("\"{0}\" is not a valid date, expected a date like 2024-01-31")]
    InvalidDateParameter(String),

    /// An error occurred while writing CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the snapshot lock
    #[error("could not acquire the snapshot lock")]
    SnapshotLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidDateParameter(date) => (
                StatusCode::BAD_REQUEST,
                Html(
                    error_view(
                        "Bad Request",
                        "400",
                        "Invalid date",
                        &format!(
                            "\"{date}\" is not a valid date. Pick a date from the date picker or \
                            write it like 2024-01-31."
                        ),
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::SnapshotReadError(_) | Error::InvalidSnapshot(_) => {
                tracing::error!("Could not load transactions: {self}");
                InternalServerError {
                    description: "Could not load transactions",
                    fix: "Check that the transactions file exists and contains a JSON array, \
                        then reload the data.",
                }
                .into_response()
            }
            Error::SnapshotLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
