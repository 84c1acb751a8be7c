//! The page to display when a route does not exist.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Page not found",
        "The page you are looking for does not exist. Head back to the dashboard to see your transactions.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
