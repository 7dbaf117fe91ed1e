//! HTTP handlers for all API routes.

pub mod conversation;
pub mod database;
pub mod flows;
pub mod graph;
pub mod health;
pub mod insights;
pub mod publications;
pub mod search;

use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Serve `bytes` as a file download.
pub(crate) fn attachment(filename: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        bytes,
    )
        .into_response()
}

/// Local calendar date, used in export headers and file names.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
