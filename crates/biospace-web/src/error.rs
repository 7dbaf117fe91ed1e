//! HTTP error type. Every failure is rendered as `{"error": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use biospace_export::ExportError;
use biospace_llm::FlowError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Generative AI backend is not configured")]
    FlowsUnavailable,

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Remote(#[from] biospace_search::ApiError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::FlowsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Flow(e) => match e {
                FlowError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                FlowError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
                FlowError::InvalidOutput(_)
                | FlowError::Llm(_)
                | FlowError::TooManyToolCalls(_)
                | FlowError::UnknownTool(_)
                | FlowError::ToolInput { .. } => StatusCode::BAD_GATEWAY,
            },
            ApiError::Export(ExportError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Remote(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
